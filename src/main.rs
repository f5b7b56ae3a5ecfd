mod config;
mod games;
mod scores;
mod terminal;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::ArcadeConfig;
use env_logger::{Builder, Env, Target};
use games::decoder::Mode as DecoderMode;
use scores::ScoreStore;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const HOME_ENV: &str = "TERM_ARCADE_HOME";
const LOG_ENV: &str = "TERM_ARCADE_LOG";
const LOG_FILE: &str = "term-arcade.log";
const CONFIG_FILE: &str = "config.toml";

#[derive(Parser, Debug)]
#[command(name = "term-arcade", version, about = "Casual games for the terminal")]
struct Cli
{
    /// TOML config file (defaults to config.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where scores and logs live (defaults to $TERM_ARCADE_HOME, then ~/.term-arcade)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command
{
    /// List the available games
    List,
    /// Show saved high scores
    Scores,
    /// Snake with smooth movement
    Snake
    {
        /// Board side length in tiles
        #[arg(long)]
        grid: Option<i32>,
    },
    /// Basketball shooting
    Hoops
    {
        /// Show the predicted flight path while aiming
        #[arg(long)]
        trajectory: bool,
    },
    /// Pi digit quiz
    Pi,
    /// Substitution cipher puzzles
    Decoder
    {
        #[arg(long, value_enum, default_value_t = DecoderMode::Challenge)]
        mode: DecoderMode,
    },
    /// The 24 card game
    Twentyfour,
}

struct Session
{
    config: ArcadeConfig,
    scores: ScoreStore,
}

fn main()
{
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()>
{
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;
    if let Err(err) = init_logging(&data_dir) {
        eprintln!("Warning: logging disabled ({err:#}).");
    }

    let config = load_config(cli.config.as_deref(), &data_dir);
    let mut session = Session {
        config,
        scores: ScoreStore::open(&data_dir),
    };

    match cli.command {
        None => interactive_menu(&mut session),
        Some(Command::List) => {
            list_games();
            Ok(())
        }
        Some(Command::Scores) => {
            print_scores(&session.scores);
            Ok(())
        }
        Some(Command::Snake { grid }) => {
            if let Some(grid) = grid {
                if grid < 4 {
                    bail!("--grid must be at least 4, got {grid}");
                }
                session.config.snake.grid = grid;
            }
            run_game(games::snake::NAME, &mut session, DecoderMode::Challenge)
        }
        Some(Command::Hoops { trajectory }) => {
            session.config.hoops.show_trajectory |= trajectory;
            run_game(games::hoops::NAME, &mut session, DecoderMode::Challenge)
        }
        Some(Command::Pi) => run_game(games::pi::NAME, &mut session, DecoderMode::Challenge),
        Some(Command::Decoder { mode }) => run_game(games::decoder::NAME, &mut session, mode),
        Some(Command::Twentyfour) => {
            run_game(games::twentyfour::NAME, &mut session, DecoderMode::Challenge)
        }
    }
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf>
{
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".term-arcade"))
        .with_context(|| format!("No home directory found; pass --data-dir or set {HOME_ENV}"))
}

/// Games own the terminal, so log lines go to a file in the data directory.
fn init_logging(data_dir: &Path) -> Result<()>
{
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let file: Box<dyn Write + Send> = Box::new(file);
    Builder::from_env(Env::new().filter_or(LOG_ENV, "info"))
        .target(Target::Pipe(file))
        .format_timestamp_secs()
        .try_init()
        .context("Failed to install logger")?;
    Ok(())
}

fn load_config(flag: Option<&Path>, data_dir: &Path) -> ArcadeConfig
{
    let explicit = flag.is_some();
    let path = flag.map(Path::to_path_buf).unwrap_or_else(|| data_dir.join(CONFIG_FILE));
    let (config, warning) = ArcadeConfig::load_or_default(&path);
    if let Some(warning) = warning {
        if explicit {
            eprintln!("Warning: {warning}");
            log::warn!("{warning}");
        } else {
            log::debug!("{warning}");
        }
    }
    for warning in config.validate() {
        eprintln!("Warning: {warning}");
        log::warn!("config: {warning}");
    }
    config.sanitized()
}

fn run_game(name: &str, session: &mut Session, decoder_mode: DecoderMode) -> Result<()>
{
    log::info!("launching {name}");
    let config = &session.config;
    let scores = &mut session.scores;
    match name {
        games::snake::NAME => games::snake::run(config.snake.clone(), scores),
        games::hoops::NAME => games::hoops::run(config.hoops.clone(), scores),
        games::pi::NAME => games::pi::run(scores),
        games::decoder::NAME => games::decoder::run(decoder_mode),
        games::twentyfour::NAME => games::twentyfour::run(config.twentyfour.clone(), scores),
        other => bail!("Unknown game '{other}'. Run with --help."),
    }
}

fn interactive_menu(session: &mut Session) -> Result<()>
{
    let registry = games::registry();
    println!("Term Arcade");
    println!();
    println!("Select a game:");
    for (idx, game) in registry.iter().enumerate() {
        let best = session.scores.best(game.name);
        println!("  {}. {:<10} - {} (best {best})", idx + 1, game.name, game.description);
    }
    println!();
    print!("Enter number or name (default 1, q to quit): ");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .context("Failed to read input")?;
    let choice = input.trim();

    if choice.is_empty() {
        return run_game(registry[0].name, session, DecoderMode::Challenge);
    }
    if choice.eq_ignore_ascii_case("q") {
        return Ok(());
    }
    if let Ok(index) = choice.parse::<usize>() {
        if index >= 1 && index <= registry.len() {
            return run_game(registry[index - 1].name, session, DecoderMode::Challenge);
        }
    }
    if let Some(game) = games::find(choice) {
        return run_game(game.name, session, DecoderMode::Challenge);
    }

    bail!("Invalid selection '{choice}'.")
}

fn list_games()
{
    println!("Available games:");
    for game in games::registry() {
        println!("  {:<10} - {}", game.name, game.description);
    }
}

fn print_scores(scores: &ScoreStore)
{
    let mut any = false;
    println!("High scores:");
    for (game, score) in scores.entries() {
        println!("  {game:<10} {score}");
        any = true;
    }
    if !any {
        println!("  (none yet)");
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition_is_valid()
    {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_game_options()
    {
        let cli = Cli::parse_from(["term-arcade", "snake", "--grid", "12", "--data-dir", "/tmp/x"]);
        assert!(matches!(cli.command, Some(Command::Snake { grid: Some(12) })));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));

        let cli = Cli::parse_from(["term-arcade", "decoder", "--mode", "create"]);
        assert!(matches!(cli.command, Some(Command::Decoder { mode: DecoderMode::Create })));

        let cli = Cli::parse_from(["term-arcade"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_data_dir_flag_wins()
    {
        let dir = resolve_data_dir(Some(PathBuf::from("/srv/arcade"))).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/arcade"));
    }

    #[test]
    fn test_load_config_falls_back_and_sanitizes()
    {
        let dir = TempDir::new().unwrap();
        let config = load_config(None, dir.path());
        assert_eq!(config, ArcadeConfig::default());

        let path = dir.path().join("custom.toml");
        fs::write(&path, "[snake]\ngrid = 2\n[hoops]\nshow_trajectory = true\n").unwrap();
        let config = load_config(Some(&path), dir.path());
        assert_eq!(config.snake.grid, 20);
        assert!(config.hoops.show_trajectory);
    }

    #[test]
    fn test_unknown_game_is_an_error()
    {
        let dir = TempDir::new().unwrap();
        let mut session = Session {
            config: ArcadeConfig::default(),
            scores: ScoreStore::open(dir.path()),
        };
        let err = run_game("wordle", &mut session, DecoderMode::Challenge).unwrap_err();
        assert!(err.to_string().contains("Unknown game 'wordle'"));
    }
}
