use crate::command::{Command, HELP};
use campus::Wizard;
use campus::admissions::{AdmissionsError, Navigation, RegistrationFlow};
use campus::domain::reference::DropdownOption;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

enum Outcome {
    Continue,
    Quit,
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run<F: RegistrationFlow>(mut wizard: Wizard<F>) -> anyhow::Result<()> {
    println!("{} registration, step {} of {}", F::NAME, wizard.step(), wizard.total_steps());
    let empty = wizard.references().empty_lists();
    if !empty.is_empty() {
        let names: Vec<String> = empty.iter().map(ToString::to_string).collect();
        println!("warning: no data for {}", names.join(", "));
    }
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{usage}");
                continue;
            },
        };
        debug!(?command, "Console command");

        match execute(&mut wizard, command).await {
            Ok(Outcome::Continue) => {},
            Ok(Outcome::Quit) => break,
            Err(err) => println!("error: {}", describe(&err)),
        }
    }

    Ok(())
}

async fn execute<F: RegistrationFlow>(
    wizard: &mut Wizard<F>,
    command: Command,
) -> Result<Outcome, AdmissionsError> {
    match command {
        Command::Show => show(wizard),
        Command::Set { field, value } => wizard.set_field_named(&field, value).await?,
        Command::Attach { slot, path } => {
            let preview = wizard.attach(slot, path).await?;
            println!("{slot} attached ({preview})");
        },
        Command::Detach(slot) => wizard.detach(slot).await?,
        Command::Region(target, code) => {
            wizard.select_region(target, &code).await?;
            print_options(&wizard.cascade(target).zones);
        },
        Command::Zone(target, code) => {
            wizard.select_zone(target, &code).await?;
            print_options(&wizard.cascade(target).woredas);
        },
        Command::Woreda(target, code) => wizard.select_woreda(target, &code).await?,
        Command::Options(list) => print_options(&wizard.options(list)),
        Command::Zones(target) => print_options(&wizard.cascade(target).zones),
        Command::Woredas(target) => print_options(&wizard.cascade(target).woredas),
        Command::Next => report(wizard.advance().await?, wizard.total_steps()),
        Command::Back => report(wizard.retreat().await?, wizard.total_steps()),
        Command::Submit => {
            let receipt = wizard.submit().await?;
            println!("registration accepted (HTTP {}), starting over", receipt.status);
        },
        Command::Discard => {
            wizard.discard().await?;
            println!("draft discarded");
        },
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Continue)
}

/// Backend failures get the operator-facing text, local ones the full error chain.
fn describe(err: &AdmissionsError) -> String {
    match err {
        AdmissionsError::Rejected { .. } | AdmissionsError::Unreachable { .. } => {
            err.user_message().into_owned()
        },
        _ => err.to_string(),
    }
}

fn show<F: RegistrationFlow>(wizard: &Wizard<F>) {
    println!("step {} of {}", wizard.step(), wizard.total_steps());
    match serde_json::to_string_pretty(wizard.draft()) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("error: {err}"),
    }
}

fn report(navigation: Navigation, total: u8) {
    match navigation {
        Navigation::Moved(step) => println!("step {step} of {total}"),
        Navigation::Stayed(step) => println!("still on step {step} of {total}"),
        Navigation::Blocked(missing) => {
            let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
            println!("required: {}", names.join(", "));
        },
    }
}

fn print_options(options: &[DropdownOption]) {
    if options.is_empty() {
        println!("(no options)");
    }
    for option in options {
        println!("  {:<10} {}", option.value, option.label);
    }
}
