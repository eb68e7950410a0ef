//! Clap command tree definition.
//!
//! Each subcommand maps to exactly one contract operation; `invoke` takes the
//! raw ledger calling convention instead.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("supplychain")
        .about("Track products on a supply-chain ledger")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: supplychain.toml)")
                .global(true),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .help("World state file, overrides the config")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .conflicts_with("raw")
                .global(true),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Raw output mode (compact JSON records, no prefixes)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_init())
        .subcommand(build_create())
        .subcommand(build_update())
        .subcommand(build_transfer())
        .subcommand(build_query())
        .subcommand(build_exists())
        .subcommand(build_list())
        .subcommand(build_invoke())
}

// =========================================================================
// Writes
// =========================================================================

fn build_init() -> Command {
    Command::new("init").about("Seed the ledger with the bootstrap products")
}

fn build_create() -> Command {
    Command::new("create")
        .about("Create a product with status \"Created\"")
        .arg(Arg::new("id").required(true))
        .arg(Arg::new("name").required(true))
        .arg(Arg::new("owner").required(true))
        .arg(Arg::new("description").default_value(""))
        .arg(Arg::new("category").default_value(""))
}

fn build_update() -> Command {
    Command::new("update")
        .about("Replace a product's status, owner, description and category")
        .arg(Arg::new("id").required(true))
        .arg(Arg::new("status").required(true))
        .arg(Arg::new("owner").required(true))
        .arg(Arg::new("description").required(true))
        .arg(Arg::new("category").required(true))
}

fn build_transfer() -> Command {
    Command::new("transfer")
        .about("Transfer ownership of a product")
        .arg(Arg::new("id").required(true))
        .arg(Arg::new("new_owner").required(true))
}

// =========================================================================
// Reads
// =========================================================================

fn build_query() -> Command {
    Command::new("query")
        .about("Show one product")
        .arg(Arg::new("id").required(true))
}

fn build_exists() -> Command {
    Command::new("exists")
        .about("Check whether a product exists")
        .arg(Arg::new("id").required(true))
}

fn build_list() -> Command {
    Command::new("list").about("List every product in id order")
}

// =========================================================================
// Raw invocation
// =========================================================================

fn build_invoke() -> Command {
    Command::new("invoke")
        .about("Invoke a contract function by name, e.g. invoke QueryProduct p1")
        .arg(Arg::new("function").required(true))
        .arg(
            Arg::new("args")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_tree_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_create_defaults_optional_fields() {
        let matches = build_cli()
            .try_get_matches_from(["supplychain", "create", "p2", "Phone", "CompanyA"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "create");
        assert_eq!(sub.get_one::<String>("description").unwrap(), "");
        assert_eq!(sub.get_one::<String>("category").unwrap(), "");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(["supplychain", "list", "--json", "--state", "s.json"])
            .unwrap();
        assert!(matches.get_flag("json"));
        assert_eq!(matches.get_one::<String>("state").unwrap(), "s.json");
    }

    #[test]
    fn test_json_conflicts_with_raw() {
        let result =
            build_cli().try_get_matches_from(["supplychain", "list", "--json", "--raw"]);
        assert!(result.is_err());
    }
}
