use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::debug;

use cygscript::{
    decode_args, load_config, resolve_root, run, LaunchContext, NativeOracle, ScriptError,
};

#[derive(Parser, Debug)]
#[command(name = "cygscript", version, about = "Run a POSIX shell script from Windows")]
struct Cli {
    /// Shell installation root (overrides CYGSCRIPT_ROOT)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Shell executable, relative to the root or absolute
    #[arg(long, value_name = "PATH")]
    shell: Option<String>,

    /// Mount prefix for drive letters
    #[arg(long, value_name = "PREFIX")]
    cygdrive: Option<String>,

    /// Script to run, followed by arguments passed to it unchanged
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "SCRIPT [ARGS]..."
    )]
    command: Vec<OsString>,
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let code = match run_cli(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("cygscript: {}", err.display_simple());
            err.exit_code()
        }
    };
    process::exit(code);
}

fn init_logging() {
    let env = env_logger::Env::default().filter_or("CYGSCRIPT_LOG", "warn");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

fn run_cli(cli: Cli) -> Result<i32, ScriptError> {
    let mut config = load_config().map_err(|err| {
        ScriptError::new(cygscript::ErrorKind::Config, format!("cannot read config: {err}"))
    })?;
    if let Some(root) = cli.root {
        config.root = Some(root);
    }
    if let Some(shell) = cli.shell {
        config.shell = shell;
    }
    if let Some(cygdrive) = cli.cygdrive {
        config.cygdrive = cygdrive;
    }

    let exe = env::current_exe().ok();
    let root = resolve_root(&config, exe.as_deref())?;
    let inherited_path = env::var("PATH").ok();
    let ctx = LaunchContext {
        root: &root,
        shell: &config.shell,
        cygdrive: &config.cygdrive,
        inherited_path: inherited_path.as_deref(),
        oracle: &NativeOracle,
    };

    let args = decode_args(cli.command);
    debug!("exec args={args:?} root={}", root.display());
    run(&args, &ctx)
}
