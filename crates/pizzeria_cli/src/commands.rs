//! Subcommand execution against an open store connection.

use crate::app::{Commands, PizzaCommand, ToppingCommand};
use anyhow::Result;
use pizzeria_core::{
    Pizza, PizzaCatalog, PizzaId, SqlitePizzaRepository, SqliteToppingRepository, Topping,
    ToppingRegistry,
};
use rusqlite::Connection;
use std::io::Write;

/// Runs one command and writes its user-facing output to `out`.
pub fn execute(
    command: Commands,
    conn: &Connection,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Toppings(command) => run_toppings(command, conn, json, out),
        Commands::Pizzas(command) => run_pizzas(command, conn, json, out),
    }
}

fn run_toppings(
    command: ToppingCommand,
    conn: &Connection,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut registry = ToppingRegistry::load(SqliteToppingRepository::new(conn))?;
    match command {
        ToppingCommand::List => {}
        ToppingCommand::Add { name } => {
            registry.add(&name)?;
            writeln!(out, "Topping added.")?;
        }
        ToppingCommand::Rename { old_name, new_name } => {
            registry.rename(&old_name, &new_name)?;
            writeln!(out, "Topping renamed.")?;
        }
        ToppingCommand::Remove { name } => {
            registry.remove(&name)?;
            writeln!(out, "Topping removed.")?;
        }
    }
    print_toppings(registry.list(), json, out)
}

fn run_pizzas(
    command: PizzaCommand,
    conn: &Connection,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut catalog = PizzaCatalog::load(SqlitePizzaRepository::new(conn))?;
    let registry = ToppingRegistry::load(SqliteToppingRepository::new(conn))?;
    match command {
        PizzaCommand::List => {}
        PizzaCommand::Add { title, toppings } => {
            let id = catalog.add(&title, toppings)?;
            writeln!(out, "Pizza {id} added.")?;
        }
        PizzaCommand::Update {
            id,
            title,
            toppings,
        } => {
            catalog.update(PizzaId(id), &title, toppings)?;
            writeln!(out, "Pizza {id} updated.")?;
        }
        PizzaCommand::Remove { id } => {
            catalog.remove(PizzaId(id))?;
            writeln!(out, "Pizza {id} removed.")?;
        }
    }
    print_pizzas(catalog.list(), json, out)?;
    if !json {
        print_available_toppings(registry.list(), out)?;
    }
    Ok(())
}

fn print_toppings(toppings: &[Topping], json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, toppings)?;
        writeln!(out)?;
        return Ok(());
    }
    if toppings.is_empty() {
        writeln!(out, "No toppings.")?;
    }
    for topping in toppings {
        writeln!(out, "{}", topping.name)?;
    }
    Ok(())
}

fn print_pizzas(pizzas: &[Pizza], json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, pizzas)?;
        writeln!(out)?;
        return Ok(());
    }
    if pizzas.is_empty() {
        writeln!(out, "No pizzas.")?;
    }
    for pizza in pizzas {
        writeln!(
            out,
            "{}\tTitle: {}\tToppings: {}",
            pizza.id,
            pizza.title,
            pizza.toppings.join(", ")
        )?;
    }
    Ok(())
}

fn print_available_toppings(toppings: &[Topping], out: &mut impl Write) -> Result<()> {
    let names = toppings
        .iter()
        .map(|topping| topping.name.as_str())
        .collect::<Vec<_>>();
    if names.is_empty() {
        writeln!(out, "Available toppings: none")?;
    } else {
        writeln!(out, "Available toppings: {}", names.join(", "))?;
    }
    Ok(())
}
