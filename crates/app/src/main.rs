use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use services::{
    AnswerFeedback, AppAction, AppStateStore, AppView, HttpQuestionApi, QuestionApi, QuizOutcome,
    QuizService, QuizVm, SettingsService, StatsService,
};
use storage::{KeyValueStore, SessionStore, SqliteStore};
use talk100_core::grading::keyword_key;
use talk100_core::model::InputMode;

mod sample;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDay { raw: String },
    InvalidMode { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDay { raw } => write!(f, "invalid --day value: {raw}"),
            ArgsError::InvalidMode { raw } => write!(f, "invalid --mode value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quiz     [--db <path>] [--api <url>] [--day <n>] [--mode voice|keyboard]");
    eprintln!("  cargo run -p app -- progress [--db <path>] [--api <url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db talk100.sqlite3");
    eprintln!("  --day 1");
    eprintln!("  --mode from saved settings (keyboard unless changed)");
    eprintln!();
    eprintln!("Without --api, a bundled offline question set is used.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TALK100_DB, TALK100_API_URL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Progress,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "progress" => Some(Self::Progress),
            _ => None,
        }
    }
}

struct Args {
    db_path: String,
    api_url: Option<String>,
    day: u32,
    mode: Option<InputMode>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_path = std::env::var("TALK100_DB")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "talk100.sqlite3".to_string());
        let mut api_url = std::env::var("TALK100_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let mut day = 1_u32;
        let mut mode = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_path = require_value(args, "--db")?,
                "--api" => api_url = Some(require_value(args, "--api")?),
                "--day" => {
                    let value = require_value(args, "--day")?;
                    day = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDay { raw: value })?;
                }
                "--mode" => {
                    let value = require_value(args, "--mode")?;
                    mode = Some(match value.as_str() {
                        "voice" => InputMode::Voice,
                        "keyboard" => InputMode::Keyboard,
                        _ => return Err(ArgsError::InvalidMode { raw: value }),
                    });
                }
                other => return Err(ArgsError::UnknownArg(other.to_string())),
            }
        }

        Ok(Self {
            db_path,
            api_url,
            day,
            mode,
        })
    }
}

struct AppServices {
    quiz: QuizService,
    stats: StatsService,
    settings: SettingsService,
    state: AppStateStore,
}

fn build_services(args: &Args) -> Result<AppServices, Box<dyn std::error::Error>> {
    let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&args.db_path)?);
    let api: Arc<dyn QuestionApi> = match &args.api_url {
        Some(url) => Arc::new(HttpQuestionApi::new(url.clone())),
        None => Arc::new(sample::SampleApi),
    };

    let store = SessionStore::new(Arc::clone(&kv));
    Ok(AppServices {
        quiz: QuizService::new(store, Arc::clone(&api)),
        stats: StatsService::new(api),
        settings: SettingsService::new(kv),
        state: AppStateStore::default(),
    })
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(first) = args.next() else {
        print_usage();
        std::process::exit(2);
    };
    let Some(command) = Command::from_arg(&first) else {
        eprintln!("unknown subcommand: {first}");
        print_usage();
        std::process::exit(2);
    };

    let parsed = match Args::parse(&mut args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = run(command, &parsed) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let app = build_services(args)?;

    match command {
        Command::Quiz => run_quiz(&runtime, &app, args),
        Command::Progress => run_progress(&runtime, &app),
    }
}

fn run_quiz(
    runtime: &tokio::runtime::Runtime,
    app: &AppServices,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = app.settings.load()?;
    let mode = args.mode.unwrap_or_else(|| settings.default_input_mode());

    app.state.dispatch(AppAction::Navigate(AppView::Quiz));

    let started = runtime.block_on(app.quiz.start_category_quiz(args.day, mode))?;
    let mut vm = QuizVm::new(started);
    println!(
        "Day {} quiz, {} questions ({} mode). Ctrl-D abandons the run.",
        args.day,
        vm.total_questions(),
        vm.input_mode().as_str()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(question) = vm.current_question().cloned() else {
            break;
        };
        println!();
        println!(
            "[{}/{}] {}",
            vm.question_number(),
            vm.total_questions(),
            question.prompt
        );

        let feedback = match vm.input_mode() {
            InputMode::Keyboard => {
                let mut inputs = HashMap::new();
                for keyword in &question.keywords {
                    print!("  {} letters, starts with '{}' ▸ ",
                        keyword.chars().count(),
                        keyword.chars().next().unwrap_or(' '));
                    io::stdout().flush()?;
                    let Some(line) = lines.next().transpose()? else {
                        return abandon(app, &mut vm);
                    };
                    inputs.insert(keyword_key(keyword), line.trim().to_string());
                }
                runtime.block_on(vm.submit_keyboard(&app.quiz, &inputs))?
            }
            InputMode::Voice => {
                print!("  say it ▸ ");
                io::stdout().flush()?;
                let Some(line) = lines.next().transpose()? else {
                    return abandon(app, &mut vm);
                };
                runtime.block_on(vm.submit_voice(&app.quiz, line.trim()))?
            }
        };

        print_feedback(feedback, &question.answer);

        match vm.next() {
            QuizOutcome::Continue => {}
            QuizOutcome::Completed => break,
        }
    }

    runtime.block_on(app.quiz.finish(vm.session_id()))?;
    app.state.dispatch(AppAction::Navigate(AppView::Home));
    println!();
    println!("Quiz complete. 수고했어요!");
    Ok(())
}

fn abandon(app: &AppServices, vm: &mut QuizVm) -> Result<(), Box<dyn std::error::Error>> {
    app.quiz.abandon(vm.session_id())?;
    app.state.dispatch(AppAction::Navigate(AppView::Home));
    println!();
    println!("Quiz abandoned.");
    Ok(())
}

fn print_feedback(feedback: &AnswerFeedback, answer: &str) {
    let summary = feedback.summary();
    match feedback {
        AnswerFeedback::Keyboard(grading) => {
            for detail in &grading.details {
                let mark = if detail.is_correct { "o" } else { "x" };
                println!("  [{mark}] {} ({})", detail.keyword, detail.user_input);
            }
        }
        AnswerFeedback::Voice(grading) => {
            if !grading.missed_keywords.is_empty() {
                println!("  missing: {}", grading.missed_keywords.join(", "));
            }
        }
    }
    if summary.is_all_correct {
        println!("  correct! ({}%)", summary.percentage);
    } else {
        println!("  {}%, try again", summary.percentage);
        println!("  answer: {answer}");
    }
}

fn run_progress(
    runtime: &tokio::runtime::Runtime,
    app: &AppServices,
) -> Result<(), Box<dyn std::error::Error>> {
    app.state.dispatch(AppAction::Navigate(AppView::Progress));
    let board = runtime.block_on(app.stats.load_board())?;

    if board.rows.is_empty() {
        println!("No progress yet.");
        return Ok(());
    }
    for row in &board.rows {
        println!(
            "Day {:>3}  {:>3}/{:<3}  {:>3}%",
            row.day, row.completed, row.total, row.percentage
        );
    }
    println!(
        "Overall  {}/{} ({}%), {} days finished",
        board.completed,
        board.total,
        board.percentage,
        board.finished_days()
    );
    Ok(())
}
