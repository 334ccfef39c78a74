use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

use crate::{
    appsettings::DisplaySettings,
    reminder::{NewReminder, ValidationError},
};

/// What a date or time picker hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerResult<T> {
    Dismissed,
    Selected(T),
}

/// Candidate due time assembled from separate date and time pickers.
///
/// The candidate is local wall-clock time. The date and time texts are only shown
/// back to the user and never feed into the due time.
#[derive(Debug, Clone)]
pub struct DueDateSelection {
    candidate: NaiveDateTime,
    date_text: Option<String>,
    time_text: Option<String>,
    date_format: String,
    time_format: String,
}

impl DueDateSelection {
    pub fn starting_at(now: DateTime<Utc>, display: &DisplaySettings) -> Self {
        Self::from_local(now.with_timezone(&Local).naive_local(), display)
    }

    pub fn from_local(candidate: NaiveDateTime, display: &DisplaySettings) -> Self {
        Self {
            candidate,
            date_text: None,
            time_text: None,
            date_format: display.date_format.clone(),
            time_format: display.time_format.clone(),
        }
    }

    pub fn apply_date(&mut self, result: PickerResult<NaiveDate>) {
        let PickerResult::Selected(date) = result else {
            return;
        };

        self.candidate = date.and_time(self.candidate.time());
        self.date_text = Some(self.candidate.format(&self.date_format).to_string());
    }

    pub fn apply_time(&mut self, result: PickerResult<NaiveTime>) {
        let PickerResult::Selected(time) = result else {
            return;
        };

        let Some(time) = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0) else {
            return;
        };

        self.candidate = self.candidate.date().and_time(time);
        self.time_text = Some(self.candidate.format(&self.time_format).to_string());
    }

    pub fn candidate(&self) -> NaiveDateTime {
        self.candidate
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        match Local.from_local_datetime(&self.candidate).earliest() {
            Some(local) => local.with_timezone(&Utc),
            // Wall-clock time skipped by a DST jump.
            None => self.candidate.and_utc(),
        }
    }

    pub fn date_text(&self) -> Option<&str> {
        self.date_text.as_deref()
    }

    pub fn time_text(&self) -> Option<&str> {
        self.time_text.as_deref()
    }

    pub fn confirmation_text(&self) -> Option<String> {
        if self.date_text.is_none() && self.time_text.is_none() {
            return None;
        }

        Some(format!(
            "📌 Deadline: {} {}",
            self.date_text.as_deref().unwrap_or_default(),
            self.time_text.as_deref().unwrap_or_default()
        ))
    }

    /// Forgets the texts. The candidate stays as the starting point for the next reminder.
    pub fn clear_texts(&mut self) {
        self.date_text = None;
        self.time_text = None;
    }
}

/// Input state of the reminder screen.
#[derive(Debug, Clone)]
pub struct ReminderForm {
    pub schedule_label: String,
    pub task_label: String,
    selection: DueDateSelection,
    date_picker_visible: bool,
    time_picker_visible: bool,
}

impl ReminderForm {
    pub fn new(selection: DueDateSelection) -> Self {
        Self {
            schedule_label: String::new(),
            task_label: String::new(),
            selection,
            date_picker_visible: false,
            time_picker_visible: false,
        }
    }

    pub fn selection(&self) -> &DueDateSelection {
        &self.selection
    }

    pub fn open_date_picker(&mut self) {
        self.date_picker_visible = true;
    }

    pub fn open_time_picker(&mut self) {
        self.time_picker_visible = true;
    }

    pub fn is_date_picker_visible(&self) -> bool {
        self.date_picker_visible
    }

    pub fn is_time_picker_visible(&self) -> bool {
        self.time_picker_visible
    }

    pub fn on_date_picked(&mut self, result: PickerResult<NaiveDate>) {
        self.date_picker_visible = false;
        self.selection.apply_date(result);
    }

    pub fn on_time_picked(&mut self, result: PickerResult<NaiveTime>) {
        self.time_picker_visible = false;
        self.selection.apply_time(result);
    }

    /// Validates the current input. On success the labels and the deadline texts
    /// are cleared; on failure nothing changes.
    pub fn submit(&mut self) -> Result<NewReminder, ValidationError> {
        let reminder = NewReminder::new(
            self.schedule_label.as_str(),
            self.task_label.as_str(),
            self.selection.due_at(),
        )?;

        self.schedule_label.clear();
        self.task_label.clear();
        self.selection.clear_texts();

        Ok(reminder)
    }
}
