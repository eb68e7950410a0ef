//! Clap matches → executor `Command` conversion.

use clap::ArgMatches;
use supplychain_executor::{Command, Error, Result};

/// Convert parsed subcommand matches into a contract command.
pub fn matches_to_command(matches: &ArgMatches) -> Result<Command> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| Error::invalid_argument("no command given"))?;

    let cmd = match name {
        "init" => Command::InitLedger,
        "create" => Command::CreateProduct {
            id: arg(sub, "id")?,
            name: arg(sub, "name")?,
            owner: arg(sub, "owner")?,
            description: arg(sub, "description")?,
            category: arg(sub, "category")?,
        },
        "update" => Command::UpdateProduct {
            id: arg(sub, "id")?,
            status: arg(sub, "status")?,
            owner: arg(sub, "owner")?,
            description: arg(sub, "description")?,
            category: arg(sub, "category")?,
        },
        "transfer" => Command::TransferOwnership {
            id: arg(sub, "id")?,
            new_owner: arg(sub, "new_owner")?,
        },
        "query" => Command::QueryProduct { id: arg(sub, "id")? },
        "exists" => Command::ProductExists { id: arg(sub, "id")? },
        "list" => Command::GetAllProducts,
        "invoke" => {
            let function = arg(sub, "function")?;
            let args: Vec<&String> = sub
                .get_many::<String>("args")
                .map(|vals| vals.collect())
                .unwrap_or_default();
            Command::from_invocation(&function, args.as_slice())?
        }
        other => {
            return Err(Error::invalid_argument(format!(
                "unknown command {}",
                other
            )))
        }
    };
    Ok(cmd)
}

fn arg(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .ok_or_else(|| Error::invalid_argument(format!("missing argument <{}>", name)))
}
