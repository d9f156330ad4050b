// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).help("Record id")
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add an income or expense")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .value_parser(["income", "expense"]),
                )
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD or RFC 3339; defaults to now"),
                )
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(
            Command::new("list")
                .about("List transactions")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["income", "expense"]),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .default_value("date-desc")
                        .value_parser(["date-desc", "date-asc", "amount-desc", "amount-asc"]),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a transaction")
                .arg(id_arg()),
        )
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Manage per-category budgets")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("limit").long("limit").required(true)),
        )
        .subcommand(
            Command::new("set-limit")
                .arg(id_arg())
                .arg(Arg::new("limit").long("limit").required(true)),
        )
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(Command::new("delete").arg(id_arg()))
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Manage savings goals")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(Arg::new("date").long("date").help("Target date, YYYY-MM-DD")),
        )
        .subcommand(
            Command::new("deposit")
                .arg(id_arg())
                .arg(Arg::new("amount").required(true)),
        )
        .subcommand(
            Command::new("withdraw")
                .arg(id_arg())
                .arg(Arg::new("amount").required(true)),
        )
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(Command::new("delete").arg(id_arg()))
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Dashboard figures")
        .subcommand_required(true)
        .subcommand(Command::new("summary").arg(json_flag()))
        .subcommand(
            Command::new("monthly")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .default_value("12")
                        .value_parser(value_parser!(u32).range(1..=120)),
                )
                .arg(
                    Arg::new("reference")
                        .long("reference")
                        .help("Any date in the last month shown; defaults to today"),
                )
                .arg(json_flag()),
        )
        .subcommand(Command::new("budgets").arg(json_flag()))
}

fn settings_cmd() -> Command {
    Command::new("settings")
        .about("Language and theme preferences")
        .subcommand_required(true)
        .subcommand(Command::new("show").arg(json_flag()))
        .subcommand(
            Command::new("language").arg(
                Arg::new("code")
                    .required(true)
                    .value_parser(["en", "ar"]),
            ),
        )
        .subcommand(Command::new("toggle-language"))
        .subcommand(Command::new("toggle-theme"))
        .subcommand(Command::new("unset").arg(Arg::new("key").required(true)))
        .subcommand(Command::new("reset").about("Restore the default language and theme"))
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Back up data")
        .subcommand_required(true)
        .subcommand(
            Command::new("json").arg(
                Arg::new("dir")
                    .long("dir")
                    .default_value(".")
                    .help("Directory receiving rasid-backup-<date>.json"),
            ),
        )
        .subcommand(
            Command::new("csv").arg(Arg::new("out").long("out").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("rasid")
        .about("Local personal finance tracker")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create or upgrade the local store"))
        .subcommand(tx_cmd())
        .subcommand(budget_cmd())
        .subcommand(goal_cmd())
        .subcommand(report_cmd())
        .subcommand(settings_cmd())
        .subcommand(export_cmd())
        .subcommand(
            Command::new("import")
                .about("Restore a JSON backup")
                .arg(Arg::new("path").required(true))
                .arg(
                    Arg::new("clear")
                        .long("clear")
                        .action(ArgAction::SetTrue)
                        .help("Replace existing data instead of adding to it"),
                ),
        )
        .subcommand(Command::new("stats").about("Store statistics").arg(json_flag()))
        .subcommand(
            Command::new("clear")
                .about("Delete all transactions, budgets and goals")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .required(true),
                ),
        )
}
