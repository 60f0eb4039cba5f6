use boxword::cli::Options;
use boxword::{repl, Session};
use clap::Parser;
use miette::IntoDiagnostic;

fn main() -> miette::Result<()> {
    // Install the panic handler.
    bupropion::install(bupropion::BupropionHandlerOpts::new).into_diagnostic()?;

    // Parse the command line arguments.
    let args = Options::parse();
    let mut session = Session::new(args.layout, args.debug);

    for input in &args.values {
        let report = session.inspect(input)?;
        println!("{report}");
    }

    if args.repl {
        repl::run(&mut session)?;
    }

    Ok(())
}
