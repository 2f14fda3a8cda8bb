use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use api::{ApiConfig, ExamApi, HttpExamApi};
use quiz_core::model::{QuizId, SubmissionResult, UserId};
use services::{
    Clock, ExamSessionService, QuestionStatus, RunnerConfig, SessionEvent, SessionHandle,
    SessionPhase, SessionSnapshot,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod demo;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidId { flag: &'static str, raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    MissingQuizId,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidId { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::MissingQuizId => write!(f, "--quiz-id (or QUIZ_ID) is required"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_id<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidId { flag, raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- take --quiz-id <uuid> [--user-id <uuid>]");
    eprintln!("                           [--api <url>] [--token <token>]");
    eprintln!("  cargo run -p app -- demo [--minutes <n>] [--tick-ms <ms>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_API_BASE_URL, QUIZ_API_TOKEN, QUIZ_API_TIMEOUT_SECS, QUIZ_ID, QUIZ_USER_ID");
    eprintln!("  RUST_LOG (logs go to stderr)");
}

fn print_help() {
    println!("commands: n(ext)  p(rev)  g <number>  a <letter>  s(ubmit)  s!  y(es)  c(ancel)  q(uit)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Take,
    Demo,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "take" => Some(Self::Take),
            "demo" => Some(Self::Demo),
            _ => None,
        }
    }
}

struct TakeArgs {
    api: ApiConfig,
    quiz_id: QuizId,
    user_id: UserId,
}

struct DemoArgs {
    minutes: u32,
    tick: Duration,
}

fn env_id<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl TakeArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api = ApiConfig::from_env();
        let mut quiz_id = env_id::<QuizId>("QUIZ_ID");
        let mut user_id = env_id::<UserId>("QUIZ_USER_ID");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quiz-id" => {
                    let value = require_value(args, "--quiz-id")?;
                    quiz_id = Some(parse_id("--quiz-id", value)?);
                }
                "--user-id" => {
                    let value = require_value(args, "--user-id")?;
                    user_id = Some(parse_id("--user-id", value)?);
                }
                "--api" => api.base_url = require_value(args, "--api")?,
                "--token" => api = api.with_token(require_value(args, "--token")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let user_id = user_id.unwrap_or_else(|| {
            let id = UserId::random();
            tracing::warn!(%id, "no user id given; using a random one");
            id
        });

        Ok(Self {
            api,
            quiz_id: quiz_id.ok_or(ArgsError::MissingQuizId)?,
            user_id,
        })
    }
}

impl DemoArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            minutes: 2,
            tick: RunnerConfig::default().tick,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--minutes" => {
                    let raw = require_value(args, "--minutes")?;
                    parsed.minutes = raw
                        .parse::<u32>()
                        .ok()
                        .filter(|m| *m > 0)
                        .ok_or(ArgsError::InvalidNumber { flag: "--minutes", raw })?;
                }
                "--tick-ms" => {
                    let raw = require_value(args, "--tick-ms")?;
                    let millis = raw
                        .parse::<u64>()
                        .ok()
                        .filter(|ms| *ms > 0)
                        .ok_or(ArgsError::InvalidNumber { flag: "--tick-ms", raw })?;
                    parsed.tick = Duration::from_millis(millis);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

//
// ─── TERMINAL INPUT ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Next,
    Previous,
    Go(usize),
    Answer(char),
    Submit { force: bool },
    Confirm,
    Cancel,
    Quit,
    Help,
}

fn parse_input(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?.to_ascii_lowercase();
    let arg = parts.next();

    let input = match (head.as_str(), arg) {
        ("n" | "next", None) => Input::Next,
        ("p" | "prev", None) => Input::Previous,
        ("g" | "go", Some(n)) => Input::Go(n.parse::<usize>().ok().filter(|n| *n > 0)?),
        ("a" | "answer", Some(label)) => {
            let mut chars = label.chars();
            let c = chars.next()?;
            if chars.next().is_some() || !c.is_ascii_alphabetic() {
                return None;
            }
            Input::Answer(c)
        }
        ("s" | "submit", None) => Input::Submit { force: false },
        ("s!", None) => Input::Submit { force: true },
        ("y" | "yes", None) => Input::Confirm,
        ("c" | "cancel", None) => Input::Cancel,
        ("q" | "quit", None) => Input::Quit,
        ("h" | "help" | "?", None) => Input::Help,
        _ => return None,
    };
    Some(input)
}

fn apply(handle: &SessionHandle, snapshot: Option<&SessionSnapshot>, input: Input) -> bool {
    match input {
        Input::Next => handle.next(),
        Input::Previous => handle.previous(),
        Input::Go(number) => handle.jump_to(number - 1),
        Input::Answer(label) => {
            let Some(snapshot) = snapshot else {
                return true;
            };
            match snapshot.current.option_by_label(label) {
                Some(option) => handle.select_answer(snapshot.current.question_id, option.answer_id),
                None => println!("no option {label}"),
            }
        }
        Input::Submit { force } => handle.submit(force),
        Input::Confirm => handle.confirm_submit(),
        Input::Cancel => handle.cancel_submit(),
        Input::Help => print_help(),
        Input::Quit => {
            handle.close();
            return false;
        }
    }
    true
}

//
// ─── RENDERING ─────────────────────────────────────────────────────────────────
//

fn render(snapshot: &SessionSnapshot) {
    let progress = &snapshot.progress;
    let current = &snapshot.current;

    println!();
    println!(
        "{}  |  question {}/{} ({}% complete)  |  answered {}/{}  |  {}",
        snapshot.quiz_title,
        progress.position,
        progress.total,
        progress.percent_complete,
        progress.answered,
        progress.total,
        progress.remaining_display,
    );

    let navigator: Vec<String> = snapshot
        .navigator
        .iter()
        .map(|entry| match entry.status {
            QuestionStatus::Current => format!("[{}*]", entry.number()),
            QuestionStatus::Answered => format!("[{}+]", entry.number()),
            QuestionStatus::Unanswered => format!("[{} ]", entry.number()),
        })
        .collect();
    println!("{}", navigator.join(" "));

    println!();
    println!("{}. {}", current.number, current.content);
    for option in &current.options {
        let mark = if option.selected { "(x)" } else { "( )" };
        println!("  {mark} {}. {}", option.label, option.content);
    }

    match &snapshot.phase {
        SessionPhase::ConfirmationPending { unanswered } => {
            println!();
            println!("{unanswered} question(s) unanswered. Submit anyway? y / c");
        }
        SessionPhase::Failed { error, .. } => {
            println!();
            println!("submission failed: {error}. Press s to retry.");
        }
        _ => {}
    }
}

fn render_result(result: &SubmissionResult) {
    println!();
    println!("=== {} ===", result.quiz_title);
    println!(
        "score {:.1}/{:.1} ({:.1}%)  |  {} correct, {} incorrect  |  {}",
        result.earned_score,
        result.total_score,
        result.percentage,
        result.correct_answers,
        result.incorrect_answers(),
        if result.passed { "PASSED" } else { "FAILED" },
    );
    for (index, question) in result.question_results.iter().enumerate() {
        let mark = if question.is_correct { "+" } else { "-" };
        println!("  {mark} {}. {}", index + 1, question.question_content);
    }
}

fn should_announce(remaining_secs: u32, running_low: bool) -> bool {
    remaining_secs % 60 == 0 || (running_low && remaining_secs % 15 == 0) || remaining_secs <= 5
}

//
// ─── SESSION LOOP ──────────────────────────────────────────────────────────────
//

async fn take(
    api: Arc<dyn ExamApi>,
    quiz_id: QuizId,
    user_id: UserId,
    config: RunnerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = ExamSessionService::new(Clock::default(), api);
    let (handle, mut events) = SessionHandle::spawn(service, quiz_id, user_id, config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut snapshot: Option<SessionSnapshot> = None;
    let mut stdin_open = true;

    print_help();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    SessionEvent::Loaded(s) | SessionEvent::Changed(s) => {
                        render(&s);
                        snapshot = Some(s);
                    }
                    SessionEvent::LoadFailed(err) => return Err(err.into()),
                    SessionEvent::Tick { remaining_secs, running_low } => {
                        if should_announce(remaining_secs, running_low) {
                            println!("time left: {}", quiz_core::model::format_mm_ss(remaining_secs));
                        }
                    }
                    SessionEvent::ConfirmationRequired { .. } => {}
                    SessionEvent::Submitting { trigger } => println!("submitting ({trigger:?})..."),
                    SessionEvent::Completed(result) => {
                        render_result(&result);
                        handle.close();
                    }
                    SessionEvent::SubmitFailed { .. } => {}
                    SessionEvent::Closed => break,
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    None => {
                        stdin_open = false;
                        handle.close();
                    }
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match parse_input(&line) {
                        Some(input) => {
                            if !apply(&handle, snapshot.as_ref(), input) {
                                stdin_open = false;
                            }
                        }
                        None => print_help(),
                    },
                }
            }
        }
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Take,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let skip = usize::from(!argv[0].starts_with("--"));
    let mut iter = argv.into_iter().skip(skip);

    match cmd {
        Command::Take => {
            let parsed = TakeArgs::parse(&mut iter).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;
            tracing::info!(base_url = %parsed.api.base_url, quiz_id = %parsed.quiz_id, "taking exam");
            let api = HttpExamApi::new(parsed.api)?;
            take(
                Arc::new(api),
                parsed.quiz_id,
                parsed.user_id,
                RunnerConfig::default(),
            )
            .await
        }
        Command::Demo => {
            let parsed = DemoArgs::parse(&mut iter).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;
            let (api, quiz_id) = demo::backend(parsed.minutes)?;
            take(
                Arc::new(api),
                quiz_id,
                UserId::random(),
                RunnerConfig { tick: parsed.tick },
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
