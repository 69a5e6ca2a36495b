use intake_core::{Notification, Severity};
use intake_logging::intake_info;
use serde_json::Value;

use super::effects::HostCallbacks;
use super::render;

/// Host callbacks for the terminal: results on stdout, notifications on stderr.
#[derive(Debug, Default)]
pub(crate) struct ConsoleCallbacks {
    pub has_selection: bool,
    pub last_result: Option<Value>,
    pub notifications: Vec<Notification>,
}

impl HostCallbacks for ConsoleCallbacks {
    fn on_selection_changed(&mut self, has_selection: bool) {
        intake_info!("Selection present: {}", has_selection);
        self.has_selection = has_selection;
    }

    fn on_result(&mut self, result: Option<&Value>) {
        if let Some(result) = result {
            for line in render::render_result(result) {
                println!("{line}");
            }
        }
        self.last_result = result.cloned();
    }

    fn on_notification(&mut self, notification: &Notification) {
        let label = match notification.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &notification.description {
            Some(description) => eprintln!("{label}: {}: {description}", notification.title),
            None => eprintln!("{label}: {}", notification.title),
        }
        self.notifications.push(notification.clone());
    }
}
