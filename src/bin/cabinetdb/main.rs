use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

mod cli;
mod util;
mod cmd_create;
mod cmd_insert;
mod cmd_get;
mod cmd_find;
mod cmd_list;
mod cmd_edit;
mod cmd_remove;
mod cmd_delete_where;
mod cmd_purge;
mod cmd_stat;
mod cmd_export;
mod cmd_import;

fn main() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    let rules = cli.rules;
    match cli.cmd {
        cli::Cmd::Create { path, rec } =>
            cmd_create::exec(path, rules, rec),

        cli::Cmd::Insert { path, id, rec } =>
            cmd_insert::exec(path, rules, id, rec),

        cli::Cmd::Get { path, id, json } =>
            cmd_get::exec(path, id, json),

        cli::Cmd::Find { path, query, json } =>
            cmd_find::exec(path, query, json),

        cli::Cmd::List { path, json } =>
            cmd_list::exec(path, json),

        cli::Cmd::Edit { path, id, first_name, last_name, dob, rating, salary, gender } =>
            cmd_edit::exec(
                path,
                rules,
                id,
                cmd_edit::Patch { first_name, last_name, dob, rating, salary, gender },
            ),

        cli::Cmd::Remove { path, id } =>
            cmd_remove::exec(path, id),

        cli::Cmd::DeleteWhere { path, query } =>
            cmd_delete_where::exec(path, query),

        cli::Cmd::Purge { path, json } =>
            cmd_purge::exec(path, json),

        // --json печатает один JSON-объект (stat + metrics)
        cli::Cmd::Stat { path, json } =>
            cmd_stat::exec(path, json),

        cli::Cmd::Export { path, out } =>
            cmd_export::exec(path, out),

        cli::Cmd::Import { path, from, json } =>
            cmd_import::exec(path, rules, from, json),
    }
}
