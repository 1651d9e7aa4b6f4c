use anyhow::Result;
use console::{style, Style};
use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::error::Error;
use crate::launcher;
use crate::models::Connection;
use crate::service::{ConnectionInput, ConnectionService, DefaultsInput};

const MENU_ITEMS: &[&str] = &[
    "List connections and connect",
    "Add connection",
    "Delete connection",
    "Edit default settings",
    "Exit",
];

/// Run the interactive loop until the user exits.
///
/// Recoverable failures (bad input, store errors, launch errors) are
/// reported and drop back to the menu; only terminal I/O failures escape.
pub fn run(service: &ConnectionService) -> Result<()> {
    print_heading();

    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Please enter your choice")
            .items(MENU_ITEMS)
            .default(0)
            .interact()?;

        match choice {
            0 => list_and_connect(service)?,
            1 => add_connection(service)?,
            2 => delete_connection(service)?,
            3 => edit_defaults(service)?,
            _ => {
                println!("Exiting...");
                return Ok(());
            }
        }
    }
}

fn print_heading() {
    let border = Style::new().magenta().bold();
    let title = Style::new().cyan().bold();
    println!("{}", border.apply_to("#################"));
    println!(
        "{}  {}  {}",
        border.apply_to("#"),
        title.apply_to("SSH Manager"),
        border.apply_to("#")
    );
    println!("{}", border.apply_to("#################"));
}

fn list_and_connect(service: &ConnectionService) -> Result<()> {
    let Some(connections) = ok_or_report(service.list()) else {
        return Ok(());
    };
    if connections.is_empty() {
        println!("No connections found.");
        return Ok(());
    }
    print_table(&connections);

    let token: String = Input::new()
        .with_prompt("Enter the number of the connection to connect, or 'b' to go back")
        .allow_empty(true)
        .interact_text()?;
    if token == "b" {
        return Ok(());
    }

    let Some(index) = ok_or_report(ConnectionService::parse_selection(&token)) else {
        return Ok(());
    };
    let Some(connection) = ok_or_report(service.resolve(index)) else {
        return Ok(());
    };

    match launcher::launch(&connection) {
        Ok(status) if status.success() => {}
        Ok(status) => println!(
            "{} ssh exited with {}",
            style("!").yellow().bold(),
            status
        ),
        Err(err) => report(&err),
    }
    Ok(())
}

fn add_connection(service: &ConnectionService) -> Result<()> {
    let Some(defaults) = ok_or_report(service.defaults()) else {
        return Ok(());
    };

    println!("Adding a new connection. Press Enter to use the default value where applicable.");

    let input = ConnectionInput {
        name: prompt("Name")?,
        host: prompt("Host")?,
        port: prompt(&format!("Port (default: {})", defaults.port))?,
        username: prompt(&format!("Username (default: {})", defaults.username))?,
        ssh_key: prompt(&format!("SSH key (default: {})", defaults.ssh_key))?,
    };

    if let Some(connection) = ok_or_report(service.add(input)) {
        println!(
            "{} Connection {} added.",
            style("✓").green().bold(),
            style(&connection.name).green()
        );
    }
    Ok(())
}

fn delete_connection(service: &ConnectionService) -> Result<()> {
    let Some(connections) = ok_or_report(service.list()) else {
        return Ok(());
    };
    if connections.is_empty() {
        println!("No connections to delete.");
        return Ok(());
    }
    print_table(&connections);

    let token: String = Input::new()
        .with_prompt("Enter the number of the connection you want to delete")
        .allow_empty(true)
        .interact_text()?;

    let Some(index) = ok_or_report(ConnectionService::parse_selection(&token)) else {
        return Ok(());
    };
    if let Some(removed) = ok_or_report(service.delete(index)) {
        println!(
            "{} Connection {} deleted.",
            style("✓").green().bold(),
            style(&removed.name).green()
        );
    }
    Ok(())
}

fn edit_defaults(service: &ConnectionService) -> Result<()> {
    let Some(current) = ok_or_report(service.defaults()) else {
        return Ok(());
    };

    println!("Editing default settings. Press Enter to keep the current value.");

    let input = DefaultsInput {
        port: prompt(&format!("Port (current: {})", current.port))?,
        username: prompt(&format!("Username (current: {})", current.username))?,
        ssh_key: prompt(&format!("SSH key (current: {})", current.ssh_key))?,
    };

    if let Some(edit) = ok_or_report(service.edit_defaults(input)) {
        if let Some(rejected) = edit.rejected_port {
            println!(
                "{} Invalid port number {:?}, keeping current value.",
                style("!").yellow().bold(),
                rejected
            );
        }
        println!(
            "{} Default settings updated.",
            style("✓").green().bold()
        );
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    Ok(Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()?)
}

fn ok_or_report<T>(result: crate::error::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            report(&err);
            None
        }
    }
}

fn report(err: &Error) {
    tracing::error!("{err}");
    println!("{} {}", style("✗").red().bold(), err);
}

fn print_table(connections: &[Connection]) {
    const HEADERS: [&str; 6] = ["#", "Name", "Host", "Port", "Username", "SSH Key"];
    let column_styles = [
        Style::new().cyan(),
        Style::new().green(),
        Style::new().magenta(),
        Style::new().yellow(),
        Style::new().blue(),
        Style::new().red(),
    ];

    let rows: Vec<[String; 6]> = connections
        .iter()
        .enumerate()
        .map(|(i, conn)| {
            [
                (i + 1).to_string(),
                conn.name.clone(),
                conn.host.clone(),
                conn.port.to_string(),
                conn.username.clone(),
                conn.ssh_key.clone(),
            ]
        })
        .collect();

    let mut widths: [usize; 6] = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let header_line: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(header, width)| format!("{}", style(format!("{header:<width$}")).bold()))
        .collect();
    println!("{}", header_line.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .zip(&column_styles)
            .map(|((cell, width), color)| format!("{}", color.apply_to(format!("{cell:<width$}"))))
            .collect();
        println!("{}", cells.join("  "));
    }
}
