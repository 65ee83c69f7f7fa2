use stagehand::ui::{MessageBlock, OutputMode, PlainRenderer};
use stagehand::{parse_command, print_usage, Command};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let output_mode = OutputMode::from_env();
    let cmd = match parse_command(args) {
        Ok(cmd) => cmd,
        Err(err) => {
            let mut renderer = PlainRenderer::stderr(output_mode);
            let _ = renderer.error_block(
                &MessageBlock::new("Invalid command arguments", err.to_string())
                    .with_hint("Run `stagehand --help` to see supported command forms"),
            );
            print_usage();
            std::process::exit(2);
        }
    };

    match cmd {
        Command::Help => print_usage(),
        Command::Run { procfile } => {
            if let Err(err) = stagehand::tui::run_dashboard(&procfile) {
                let mut renderer = PlainRenderer::stderr(output_mode);
                let _ = renderer.error_block(&MessageBlock::new("Dashboard failed", err.to_string()));
                std::process::exit(1);
            }
        }
    }
}
