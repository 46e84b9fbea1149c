mod app;
mod bookings;
mod calendar;
mod config;
mod datepick;
mod help;
mod listing;
mod slotbar;
mod source;
mod theme;
use crate::app::App;
use crate::bookings::{Schedule, ViewState, YMD_FMT};
use crate::config::Config;
use crate::source::BookingSource;
use anyhow::{anyhow, Context};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::rc::Rc;
use time::{Date, OffsetDateTime};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        date: Option<Date>,
        config: Option<PathBuf>,
        source: Option<String>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut date = None;
        let mut config = None;
        let mut source = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("source") => source = Some(parser.value()?.string()?),
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            date,
            config,
            source,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                date,
                config,
                source,
            } => {
                init_tracing()?;
                let mut cfg = Config::load(config.as_deref())?;
                if let Some(url) = source {
                    cfg.source = url;
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let schedule = Rc::new(load_schedule(&cfg));
                let view = ViewState::new(date.unwrap_or(today));
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(today, schedule, view).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: bookcal [-c FILE] [--source URL] [YYYY-MM-DD]");
                println!();
                println!("Scrollable terminal calendar for browsing appointment bookings");
                println!("and picking a date and free time slot");
                println!();
                println!("Options:");
                println!("  -c FILE, --config FILE    Read settings from FILE");
                println!("  --source URL              Fetch the booking set from URL");
                println!("  -h, --help                Display this help message and exit");
                println!("  -V, --version             Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
    Ok(())
}

// The fetch happens exactly once, before the terminal is touched.  A failed
// fetch is not fatal: the calendar starts with no bookings.
fn load_schedule(cfg: &Config) -> Schedule {
    let bookings = match BookingSource::new(cfg.source.as_str()).fetch() {
        Ok(bookings) => bookings,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "failed to fetch bookings; starting with none");
            Vec::new()
        }
    };
    Schedule::new(bookings, cfg.slots.clone())
}

// Always restores the terminal, and intercepts a panic escaping the
// draw/input loop: the session cannot continue, so log the cause and leave a
// generic message in its place.
fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = catch_unwind(AssertUnwindSafe(|| func(terminal)));
    ratatui::restore();
    match r {
        Ok(r) => r,
        Err(payload) => {
            let cause = panic_message(payload.as_ref());
            error!(cause, "rendering failed");
            eprintln!("Something went wrong. Please restart the program or try again later.");
            Err(anyhow!("rendering failed: {cause}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown cause"
    }
}
