use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use chalkboard::{
    Canvas, ChannelSink, ElementShape, GeneratorConfig, ManualTimers, OpenAiClient, PlaybackDriver,
    PlaybackEvent, PlaybackOpts, PlaybackPhase, Point, RenderedElement, Scheduler, Step, SvgSink,
    Tutor,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chalkboard", version, about = "Step-by-step drawing tutor")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the generation endpoint over HTTP.
    Serve(ServeArgs),
    /// Ask a question and play the answer in the terminal.
    Ask(AskArgs),
    /// Play a saved lesson in the terminal, in real time.
    Play(PlayArgs),
    /// Render a saved lesson to one SVG file per tick, without waiting.
    Render(RenderArgs),
    /// Build a one-step lesson from plain text or an equation walk-through.
    Sketch(SketchArgs),
}

#[derive(Args, Debug)]
struct GenArgs {
    /// API key for the chat-completions endpoint.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API root (default: https://api.openai.com/v1).
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Chat model (default: gpt-4).
    #[arg(long, env = "CHALKBOARD_MODEL")]
    model: Option<String>,

    /// Sampling temperature.
    #[arg(long)]
    temperature: Option<f32>,

    /// Completion length cap.
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl GenArgs {
    fn into_config(self) -> GeneratorConfig {
        let d = GeneratorConfig::default();
        GeneratorConfig {
            api_key: self.api_key,
            base_url: self.base_url.unwrap_or(d.base_url),
            model: self.model.unwrap_or(d.model),
            temperature: self.temperature.unwrap_or(d.temperature),
            max_tokens: self.max_tokens.unwrap_or(d.max_tokens),
            timeout_secs: self.timeout_secs.unwrap_or(d.timeout_secs),
            viewport: d.viewport,
        }
    }

    fn tutor(self) -> anyhow::Result<Tutor<OpenAiClient>> {
        let config = self.into_config();
        let viewport = config.viewport;
        let client = OpenAiClient::new(config).context("configure model client")?;
        Ok(Tutor::new(client).with_viewport(viewport))
    }
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "CHALKBOARD_ADDR", default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    #[command(flatten)]
    gen_args: GenArgs,
}

#[derive(Args, Debug)]
struct AskArgs {
    /// The question to explain.
    question: String,

    /// Subject area.
    #[arg(long)]
    subject: Option<String>,

    /// Also write the lesson JSON here.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the lesson JSON instead of playing it.
    #[arg(long, default_value_t = false)]
    no_play: bool,

    #[command(flatten)]
    gen_args: GenArgs,
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Lesson JSON (an array of steps or `{"steps": [...]}`).
    #[arg(long)]
    steps: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Lesson JSON (an array of steps or `{"steps": [...]}`).
    #[arg(long)]
    steps: PathBuf,

    /// Directory for `frame-0001.svg`, `frame-0002.svg`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Args, Debug)]
struct SketchArgs {
    /// Free text, one line per text element.
    #[arg(long, conflicts_with = "equation")]
    text: Option<String>,

    /// Equation for a walk-through.
    #[arg(long, required_unless_present = "text")]
    equation: Option<String>,

    /// Walk-through step (repeatable).
    #[arg(long = "step", requires = "equation")]
    steps: Vec<String>,

    /// Explanation for the step.
    #[arg(long, default_value = "")]
    explanation: String,

    /// Output path (default: stdout).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn init_tracing(default: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => {
            init_tracing("info");
            cmd_serve(args).await
        }
        Command::Ask(args) => {
            init_tracing("warn");
            cmd_ask(args).await
        }
        Command::Play(args) => {
            init_tracing("warn");
            cmd_play(args).await
        }
        Command::Render(args) => {
            init_tracing("warn");
            cmd_render(args)
        }
        Command::Sketch(args) => cmd_sketch(args),
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let tutor = Arc::new(args.gen_args.tutor()?);
    chalkboard::server::serve(args.addr, tutor).await?;
    Ok(())
}

async fn cmd_ask(args: AskArgs) -> anyhow::Result<()> {
    let tutor = args.gen_args.tutor()?;
    let steps = tutor
        .generate(&args.question, args.subject.as_deref())
        .await
        .context("generate lesson")?;

    if let Some(path) = &args.save {
        write_steps(path, &steps)?;
        eprintln!("wrote {}", path.display());
    }
    if args.no_play {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }
    play_live(steps).await
}

async fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    play_live(read_steps(&args.steps)?).await
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let steps = read_steps(&args.steps)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let canvas = Canvas {
        width: args.width,
        height: args.height,
    };
    let mut timers = ManualTimers::new();
    let mut sched = Scheduler::new(
        SvgSink::writing_to(canvas, &args.out_dir),
        PlaybackOpts::default(),
    );
    sched.load_steps(steps, &mut timers);
    sched.play(&mut timers);
    let elapsed = sched
        .run_until_idle(&mut timers)
        .context("render lesson")?;

    eprintln!(
        "wrote {} frames to {} ({:.1}s of playback)",
        sched.sink().frames_written(),
        args.out_dir.display(),
        elapsed.as_secs_f64()
    );
    Ok(())
}

fn cmd_sketch(args: SketchArgs) -> anyhow::Result<()> {
    let origin = Point::new(100.0, 200.0);
    let instructions = match (&args.text, &args.equation) {
        (Some(text), _) => chalkboard::text_to_instructions(text, origin),
        (None, Some(eq)) => chalkboard::math_walkthrough(eq, &args.steps),
        (None, None) => anyhow::bail!("either --text or --equation is required"),
    };
    let steps = vec![Step {
        explanation: args.explanation,
        instructions,
        step_number: 1,
        total_steps: 1,
    }];

    match &args.out {
        Some(path) => {
            write_steps(path, &steps)?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&steps)?),
    }
    Ok(())
}

fn read_steps(path: &Path) -> anyhow::Result<Vec<Step>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read lesson '{}'", path.display()))?;
    chalkboard::parse_steps(&raw).with_context(|| format!("parse lesson '{}'", path.display()))
}

fn write_steps(path: &Path, steps: &[Step]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(steps)?;
    std::fs::write(path, json).with_context(|| format!("write lesson '{}'", path.display()))
}

async fn play_live(steps: Vec<Step>) -> anyhow::Result<()> {
    // An empty lesson never leaves `Idle`, so there is no `Finished` to wait for.
    if steps.is_empty() {
        eprintln!("lesson has no steps");
        return Ok(());
    }

    let (sink, mut events) = ChannelSink::new();
    let driver = PlaybackDriver::spawn(sink, PlaybackOpts::default());
    driver.load(steps).await?;
    driver.play().await?;

    let mut shown = 0;
    {
        let finished = driver.wait_for(PlaybackPhase::Finished);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(finished, ctrl_c);
        loop {
            tokio::select! {
                Some(event) = events.recv() => print_event(&event, &mut shown),
                res = &mut finished => {
                    res?;
                    break;
                }
                _ = &mut ctrl_c => {
                    driver.pause().await?;
                    eprintln!("\npaused");
                    break;
                }
            }
        }
    }

    drop(driver.shutdown().await?);
    while let Some(event) = events.recv().await {
        print_event(&event, &mut shown);
    }
    Ok(())
}

fn print_event(event: &PlaybackEvent, shown: &mut usize) {
    match event {
        PlaybackEvent::Explanation(text) if !text.is_empty() => println!("\n{text}"),
        PlaybackEvent::Explanation(_) => {}
        PlaybackEvent::Frame(elements) => {
            let from = (*shown).min(elements.len());
            for el in &elements[from..] {
                println!("  + {}", describe(el));
            }
            *shown = elements.len();
        }
    }
}

fn describe(el: &RenderedElement) -> String {
    let Point { x, y } = el.origin;
    match &el.shape {
        ElementShape::Text { text, .. } => format!("text {text:?} at ({x}, {y})"),
        ElementShape::Line { delta } => {
            format!("line ({x}, {y}) -> ({}, {})", x + delta.x, y + delta.y)
        }
        ElementShape::Arrow { delta } => {
            format!("arrow ({x}, {y}) -> ({}, {})", x + delta.x, y + delta.y)
        }
        ElementShape::Rectangle { size } => {
            format!("rectangle {}x{} at ({x}, {y})", size.width, size.height)
        }
        ElementShape::Ellipse { size } => {
            format!("ellipse {}x{} at ({x}, {y})", size.width, size.height)
        }
    }
}
