mod cli;

use std::io::{self, BufWriter, Write};

use clap::{CommandFactory, Parser};

use cli::{is_informational, ArgsError, Opt};
use hsperf_munin::{run, RunError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(err) if is_informational(&err) => err.exit(),
        Err(err) => invalid_arguments(err.into()),
    };
    let invocation = match opt.invocation() {
        Ok(invocation) => invocation,
        Err(err) => invalid_arguments(err),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = run(&invocation, std::process::id(), &mut out);
    let flushed = out.flush().map_err(RunError::from);
    if let Err(err) = result.and(flushed) {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}

fn invalid_arguments(err: ArgsError) -> ! {
    match &err {
        // clap's message already ends with the usage line.
        ArgsError::Usage(clap_err) => eprint!("invalid argument(s): {clap_err}"),
        _ => {
            eprintln!("invalid argument(s): {err}");
            eprintln!("{}", Opt::command().render_usage());
        }
    }
    std::process::exit(err.exit_code());
}
