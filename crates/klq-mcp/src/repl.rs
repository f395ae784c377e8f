//! Interactive KLQ console.
//!
//! Launch with `klq-mcp repl`. Lines not starting with `/` run as queries;
//! type `/help` for commands and Tab to complete commands, tables and keywords.

use std::path::{Path, PathBuf};

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};

use klq::presets::{self, PRESETS};
use klq::transform::parse_sort;
use klq::{NumericCoercion, QueryResult};

use crate::config::home_dir;
use crate::render;
use crate::resources::catalog::syntax_reference;
use crate::session::QuerySession;

const COMMANDS: &[(&str, &str)] = &[
    ("/tables", "List tables with row counts"),
    ("/presets", "List preset queries, optionally for one group"),
    ("/preset", "Run preset number N"),
    ("/sort", "Re-sort the last result: /sort <column> [asc|desc]"),
    ("/mode", "Numeric comparison: /mode lenient|strict"),
    ("/load", "Load tables from a directory or JSON file"),
    ("/reload", "Re-read the current data path"),
    ("/syntax", "Show the query syntax reference"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// Words offered after a `|`.
const KEYWORDS: &[&str] = &[
    "where", "sort by", "take", "limit", "project", "summarize count() by", "distinct", "count",
    "contains", "!contains", "startswith", "has", "asc", "desc",
];

/// Completion over commands, table names and query keywords.
#[derive(Default)]
struct KlqHelper {
    tables: Vec<String>,
}

impl Completer for KlqHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if input.starts_with('/') && !input.contains(' ') {
            let matches = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        if input.starts_with('/') {
            return Ok((pos, Vec::new()));
        }

        let start = input
            .rfind(|c: char| c.is_whitespace() || c == '|')
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &input[start..];
        let in_first_segment = !input.contains('|');

        let candidates: Vec<String> = if in_first_segment {
            self.tables.clone()
        } else {
            KEYWORDS.iter().map(|k| k.to_string()).collect()
        };
        let matches = candidates
            .into_iter()
            .filter(|c| c.starts_with(word))
            .map(|c| Pair {
                display: c.clone(),
                replacement: format!("{c} "),
            })
            .collect();
        Ok((start, matches))
    }
}

impl Hinter for KlqHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for KlqHelper {}
impl Validator for KlqHelper {}
impl Helper for KlqHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

struct ReplState {
    session: QuerySession,
    last: Option<QueryResult>,
}

/// Run the interactive console over the tables at `data_path`.
pub fn run(data_path: &Path, numeric: NumericCoercion) -> anyhow::Result<()> {
    let session = QuerySession::open(data_path, numeric)?;

    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mklq v{}\x1b[0m \x1b[90mpipe queries over JSON tables\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "    {} tables, {} records from {}",
        session.registry().len(),
        session.registry().total_rows(),
        data_path.display()
    );
    eprintln!();
    eprintln!(
        "    Type a query like \x1b[36mdevices | take 5\x1b[0m, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(40)
        .build();

    let mut rl: Editor<KlqHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(KlqHelper {
        tables: session.registry().names(),
    }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let hist_path = home_dir().join(".klq_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut state = ReplState {
        session,
        last: None,
    };
    let prompt = " \x1b[36mklq>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let Some(input) = line.strip_prefix('/') else {
                    run_query(line, &mut state);
                    continue;
                };
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "tables" => cmd_tables(&state),
                    "presets" => cmd_presets(args),
                    "preset" => cmd_preset(args, &mut state),
                    "sort" => cmd_sort(args, &mut state),
                    "mode" => cmd_mode(args, &mut state),
                    "load" => {
                        if cmd_load(args, &mut state) {
                            refresh_tables(&mut rl, &state);
                        }
                    }
                    "reload" => {
                        match state.session.reload() {
                            Ok(()) => eprintln!(
                                "  Reloaded {} tables.",
                                state.session.registry().len()
                            ),
                            Err(e) => eprintln!("  Reload failed: {e}"),
                        }
                        refresh_tables(&mut rl, &state);
                    }
                    "syntax" => {
                        eprintln!();
                        eprintln!("{}", syntax_reference(&state.session.registry().names()));
                        eprintln!();
                    }
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);
    Ok(())
}

fn refresh_tables(
    rl: &mut Editor<KlqHelper, rustyline::history::DefaultHistory>,
    state: &ReplState,
) {
    if let Some(helper) = rl.helper_mut() {
        helper.tables = state.session.registry().names();
    }
}

fn run_query(query: &str, state: &mut ReplState) {
    let result = state.session.engine().run(query);
    println!("{}", render::render_result(&result));
    state.last = Some(result);
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Anything else runs as a query, e.g. techniques | summarize count() by tactic");
    eprintln!();
}

fn cmd_tables(state: &ReplState) {
    let registry = state.session.registry();
    eprintln!();
    for stats in registry.stats() {
        eprintln!("    {:<28} {:>6} rows", stats.name, stats.rows);
    }
    eprintln!("    {:<28} {:>6} total records", "", registry.total_rows());
    eprintln!();
}

fn cmd_presets(args: &str) {
    if !args.is_empty() && presets::presets_in(args).is_empty() {
        eprintln!(
            "  No presets in group '{args}'. Groups: {}",
            presets::groups().join(", ")
        );
        return;
    }
    eprintln!();
    for (i, preset) in PRESETS.iter().enumerate() {
        if args.is_empty() || preset.group.eq_ignore_ascii_case(args) {
            eprintln!(
                "  {:>3}. {:<24} \x1b[90m[{}]\x1b[0m {}",
                i + 1,
                preset.label,
                preset.group,
                preset.query
            );
        }
    }
    eprintln!();
}

fn cmd_preset(args: &str, state: &mut ReplState) {
    let preset = args
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| PRESETS.get(i));
    match preset {
        Some(preset) => {
            eprintln!("  \x1b[90m{}\x1b[0m", preset.query);
            run_query(preset.query, state);
        }
        None => eprintln!("  Usage: /preset <1-{}>", PRESETS.len()),
    }
}

fn cmd_sort(args: &str, state: &mut ReplState) {
    if args.is_empty() {
        eprintln!("  Usage: /sort <column> [asc|desc]");
        return;
    }
    let Some(last) = state.last.as_mut().filter(|r| r.is_ok() && !r.rows.is_empty()) else {
        eprintln!("  Nothing to sort. Run a query first.");
        return;
    };
    let (column, order) = parse_sort(args);
    last.rows = render::sort_rows(&last.rows, &column, order);
    println!("{}", render::render_result(last));
}

fn cmd_mode(args: &str, state: &mut ReplState) {
    if args.is_empty() {
        eprintln!(
            "  Numeric comparison: {}",
            state.session.engine().config().numeric
        );
        return;
    }
    match args.parse::<NumericCoercion>() {
        Ok(mode) => {
            state.session.set_numeric(mode);
            eprintln!("  Numeric comparison: {mode}");
        }
        Err(e) => eprintln!("  {e}"),
    }
}

/// Returns whether new tables were loaded.
fn cmd_load(args: &str, state: &mut ReplState) -> bool {
    if args.is_empty() {
        eprintln!("  Usage: /load <directory or file.json>");
        return false;
    }
    let path = PathBuf::from(args);
    if !path.exists() {
        eprintln!("  No such path: {}", path.display());
        return false;
    }
    match state.session.load(&path) {
        Ok(()) => {
            let registry = state.session.registry();
            eprintln!(
                "  Loaded: {} ({} tables, {} records)",
                path.display(),
                registry.len(),
                registry.total_rows()
            );
            state.last = None;
            true
        }
        Err(e) => {
            eprintln!("  Failed to load: {e}");
            false
        }
    }
}
