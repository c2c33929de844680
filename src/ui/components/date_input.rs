use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn width(&self) -> usize {
        match self {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        }
    }
}

/// Digit-by-digit editor for the expense date.
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    digits: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            digits: String::new(),
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        self.date_part = DatePart::Year;
        self.digits.clear();
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.digits.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.digits.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.digits.push(c);
                if self.digits.len() == self.date_part.width() {
                    self.apply_digits();
                    self.digits.clear();
                }
            }
            KeyCode::Backspace => {
                self.digits.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    // Out-of-range values leave the date untouched.
    fn apply_digits(&mut self) {
        let Ok(value) = self.digits.parse::<u32>() else {
            return;
        };
        let (year, month, day) = (self.date.year(), self.date.month(), self.date.day());
        let candidate = match self.date_part {
            DatePart::Year => NaiveDate::from_ymd_opt(value as i32, month, day),
            DatePart::Month => NaiveDate::from_ymd_opt(year, value, day),
            DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
        };
        if let Some(date) = candidate {
            self.date = date;
        }
    }

    /// The date as stored on a bill.
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn get_display_string(&self) -> String {
        if !self.editing {
            return self.iso();
        }

        let pending = if self.digits.is_empty() {
            match self.date_part {
                DatePart::Year => "[AAAA]".to_string(),
                DatePart::Month => "[MM]".to_string(),
                DatePart::Day => "[JJ]".to_string(),
            }
        } else {
            format!("[{}]", self.digits)
        };

        let year = format!("{:04}", self.date.year());
        let month = format!("{:02}", self.date.month());
        let day = format!("{:02}", self.date.day());
        match self.date_part {
            DatePart::Year => format!("{}{}-{}-{}", year, pending, month, day),
            DatePart::Month => format!("{}-{}{}-{}", year, month, pending, day),
            DatePart::Day => format!("{}-{}-{}{}", year, month, day, pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(date: &str) -> DateInputState {
        let mut state = DateInputState::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap());
        state.toggle_editing();
        state
    }

    fn type_digits(state: &mut DateInputState, digits: &str) {
        for c in digits.chars() {
            state.handle_input(KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_each_part_builds_the_date() {
        let mut state = editing("2020-01-01");

        type_digits(&mut state, "2023");
        state.handle_input(KeyCode::Right);
        type_digits(&mut state, "06");
        state.handle_input(KeyCode::Right);
        type_digits(&mut state, "11");

        assert_eq!(state.iso(), "2023-06-11");
    }

    #[test]
    fn impossible_days_are_ignored() {
        let mut state = editing("2023-02-10");
        state.handle_input(KeyCode::Left);
        type_digits(&mut state, "30");

        assert_eq!(state.iso(), "2023-02-10");
    }

    #[test]
    fn display_marks_the_part_being_edited() {
        let mut state = editing("2023-06-11");
        assert_eq!(state.get_display_string(), "2023[AAAA]-06-11");

        state.handle_input(KeyCode::Right);
        state.handle_input(KeyCode::Char('1'));
        assert_eq!(state.get_display_string(), "2023-06[1]-11");

        state.toggle_editing();
        assert_eq!(state.get_display_string(), "2023-06-11");
    }
}
