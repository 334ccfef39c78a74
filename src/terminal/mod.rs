mod command;

pub use command::{Command, CommandError, HELP};

use std::{
    io::{self, BufRead},
    thread,
};

use tokio::sync::mpsc;

use crate::{app::ReminderApp, reminder::ReminderView};

type HandlerResult = anyhow::Result<Flow>;

const LINE_BUFFER: usize = 16;

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Reads commands from stdin until `quit`, end of input or Ctrl-C.
pub async fn run(app: &mut ReminderApp) -> anyhow::Result<()> {
    log::info!("Starting terminal interface");
    println!("📅 Class schedule & assignment reminders\n\n{HELP}\n");

    let lines = spawn_line_reader(io::BufReader::new(io::stdin()));
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            log::error!("Could not listen for Ctrl-C: {error}");
            std::future::pending::<()>().await;
        }
    };

    run_lines(app, lines, ctrl_c).await
}

/// Reads lines on a plain thread. A read blocked on the terminal then never
/// holds up runtime shutdown; the thread ends at end of input or once the
/// receiver is gone.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    thread::spawn(move || {
        for line in reader.lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    rx
}

pub async fn run_lines(
    app: &mut ReminderApp,
    mut lines: mpsc::Receiver<io::Result<String>>,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.recv() => line.transpose()?,
            _ = &mut shutdown => None,
        };

        let Some(line) = line else {
            break;
        };

        if line.trim().is_empty() {
            continue;
        }

        let flow = match line.parse::<Command>() {
            Ok(command) => handle_command(app, command).await?,
            Err(error) => {
                println!("{error}");
                Flow::Continue
            }
        };

        if flow == Flow::Quit {
            break;
        }
    }

    Ok(())
}

pub async fn handle_command(app: &mut ReminderApp, command: Command) -> HandlerResult {
    match command {
        Command::Schedule(text) => app.form.schedule_label = text,
        Command::Task(text) => app.form.task_label = text,
        Command::Date(result) => {
            app.form.open_date_picker();
            app.form.on_date_picked(result);
            print_deadline(app);
        }
        Command::Time(result) => {
            app.form.open_time_picker();
            app.form.on_time_picked(result);
            print_deadline(app);
        }
        Command::Add => match app.submit_form().await {
            Ok(item) => println!("Added reminder {}.", item.id),
            Err(error) => println!("Error: {error}"),
        },
        Command::List => print_reminders(app).await,
        Command::Delete(id) => {
            if app.delete_reminder(id).await {
                println!("Deleted reminder {id}.");
            } else {
                println!("There is no reminder {id}.");
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

fn print_deadline(app: &ReminderApp) {
    if let Some(text) = app.form.selection().confirmation_text() {
        println!("{text}");
    }
}

async fn print_reminders(app: &ReminderApp) {
    let reminders = app.reminders().await;
    if reminders.is_empty() {
        println!("No reminders yet.");
        return;
    }

    for view in &reminders {
        println!("{}", render_reminder(view, &app.display().datetime_format));
    }
}

pub fn render_reminder(view: &ReminderView, datetime_format: &str) -> String {
    let item = &view.item;
    let expired = if view.expired { " (expired)" } else { "" };

    format!(
        "[{}] 🗓️ {}\n    {}\n    ⏰ {}{expired}",
        item.id,
        item.schedule_label,
        item.task_label,
        item.due_at_local(datetime_format)
    )
}
