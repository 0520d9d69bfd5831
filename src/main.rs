use stackish::{ lang::tokenizing::tokenize_from_file,
                repl::{ fold_or_fallback, Repl, ReplConfig },
                runtime::{ error,
                           interpreter::{ execute, Halt } } };
use std::{ env::{ args, var_os },
           process::{ ExitCode, Termination } };
use tracing::{ debug, info };
use tracing_subscriber::{ fmt, EnvFilter };



/// Environment variable holding the log filter, `warn` if unset.
const LOG_VARIABLE: &str = "STACKISH_LOG";

/// Setting this environment variable to anything turns constant folding off.
const NO_FOLD_VARIABLE: &str = "STACKISH_NO_FOLD";

const USAGE: &str = "Usage: stackish [--no-fold] [script-file]";



/// Send log output to stderr so it never mixes with what the program prints.
fn init_logging()
{
    let filter = EnvFilter::try_from_env(LOG_VARIABLE).unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}



/// What the command line asked for.
struct Options
{
    fold: bool,
    script: Option<String>
}


impl Options
{
    fn from_args() -> Result<Options, String>
    {
        let mut options = Options { fold: var_os(NO_FOLD_VARIABLE).is_none(), script: None };

        for argument in args().skip(1)
        {
            match argument.as_str()
            {
                "--no-fold" => options.fold = false,

                flag if flag.starts_with("--") =>
                    return Err(format!("Unknown option {}.", flag)),

                path if options.script.is_none() => options.script = Some(path.to_string()),

                extra => return Err(format!("Unexpected argument {}.", extra))
            }
        }

        Ok(options)
    }
}



/// Compile and run a whole script file against the process's stdin and stdout.
fn run_script(path: &str, fold: bool) -> error::Result<Halt>
{
    let code = tokenize_from_file(path)?;
    let code = if fold { fold_or_fallback(code) } else { code };

    info!(path, instructions = code.len(), "Running script.");
    execute(code)
}


fn main() -> ExitCode
{
    init_logging();

    let options = match Options::from_args()
        {
            Ok(options) => options,
            Err(message) =>
                {
                    eprintln!("{}\n{}", message, USAGE);
                    return ExitCode::FAILURE;
                }
        };

    debug!(fold = options.fold, script = ?options.script, "Starting.");

    let result = match &options.script
        {
            Some(path) => run_script(path, options.fold),
            None => Repl::new(ReplConfig { fold: options.fold, ..ReplConfig::default() }).run()
        };

    match result
    {
        Ok(halt) =>
            {
                debug!(?halt, "Finished.");
                ExitCode::SUCCESS
            },

        Err(error) => error.report()
    }
}
