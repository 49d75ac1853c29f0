use std::io::Write;

use anyhow::{Context as _, Result};
use arbor::{config::RuntimeConfig, view::Control};
use tracing::info;

use crate::main_window::App;

/// Scripted user input for a headless session.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Text typed into the name field, then committed.
    pub name: Option<String>,
    /// Text typed into the age field.
    pub age: Option<String>,
    /// Click save after typing.
    pub save: bool,
    /// Click clear at the end.
    pub clear: bool,
    /// Print the person form's command table.
    pub commands: bool,
}

/// What a session left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Was the session running without controllers?
    pub designer: bool,
    /// Was save enabled once input was complete?
    pub save_enabled: bool,
    /// Dialogs opened by save.
    pub dialogs: usize,
    /// Message shown in the last dialog.
    pub last_message: Option<String>,
    /// Name field text when the session ended.
    pub name: String,
    /// Age field text when the session ended.
    pub age: String,
    /// Did the form's controller unload when the window closed?
    pub unloaded: bool,
}

/// Drive the application through `script`, writing the command table to
/// `out` when asked.
pub fn run(config: &RuntimeConfig, script: &Script, out: &mut dyn Write) -> Result<Report> {
    let app = App::open(config).context("failed to open the main window")?;
    let form = app.form();

    if let Some(name) = &script.name {
        form.name.input(name);
        form.name.commit();
    }
    if let Some(age) = &script.age {
        form.age.type_text(age);
    }
    let save_enabled = form.save.is_enabled();
    if script.save {
        form.save.click();
    }
    if script.clear {
        form.clear.click();
    }
    if script.commands
        && let Some(cx) = app.person.controller()
    {
        cx.print_command_table(out)?;
    }

    let (dialogs, last_message) = match app.person.controller() {
        Some(cx) => {
            let controller = cx.controller();
            (
                controller.dialogs_opened(),
                controller.last_dialog().map(|d| d.message()),
            )
        }
        None => (0, None),
    };

    app.main.view().quit.click();
    if app.main.is_designer() {
        app.window().close();
    }
    let unloaded = app
        .person
        .controller()
        .is_some_and(|cx| cx.controller().is_unloaded());

    let report = Report {
        designer: app.person.is_designer(),
        save_enabled,
        dialogs,
        last_message,
        name: form.name.text(),
        age: form.age.text(),
        unloaded,
    };
    info!(?report, "session finished");
    Ok(report)
}
