#[cfg(test)]
#[path = "login_form_test.rs"]
mod tests;

use ratatui::prelude::Backend;
use ratatui::prelude::Constraint;
use ratatui::prelude::Direction;
use ratatui::prelude::Layout;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tui_textarea::Input;
use tui_textarea::Key;

use super::Credentials;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    focus: Option<LoginField>,
}

impl LoginForm {
    pub fn new(email: &str) -> LoginForm {
        let mut form = LoginForm {
            email: email.to_string(),
            ..LoginForm::default()
        };
        if !form.email.is_empty() {
            form.focus = Some(LoginField::Password);
        }

        return form;
    }

    pub fn focus(&self) -> LoginField {
        return self.focus.unwrap_or(LoginField::Email);
    }

    pub fn toggle_focus(&mut self) {
        match self.focus() {
            LoginField::Email => self.focus = Some(LoginField::Password),
            LoginField::Password => self.focus = Some(LoginField::Email),
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus() {
            LoginField::Email => return &mut self.email,
            LoginField::Password => return &mut self.password,
        }
    }

    pub fn input(&mut self, input: Input) {
        match input {
            Input {
                key: Key::Backspace,
                ..
            } => {
                self.focused_mut().pop();
            }
            Input {
                key: Key::Char(c),
                ctrl: false,
                alt: false,
            } => {
                self.focused_mut().push(c);
            }
            _ => (),
        }
    }

    pub fn paste(&mut self, text: &str) {
        let single_line = text.lines().next().unwrap_or_default();
        self.focused_mut().push_str(single_line);
    }

    pub fn credentials(&self) -> Credentials {
        return Credentials::new(&self.email, &self.password);
    }

    pub fn clear_password(&mut self) {
        self.password.clear();
    }

    fn field<'a>(&self, field: LoginField, title: &'a str, text: String) -> Paragraph<'a> {
        let mut border_style = Style::default();
        if self.focus() == field {
            border_style = border_style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }

        return Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style)
                .title(title)
                .padding(Padding::new(1, 1, 0, 0)),
        );
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, loading: bool) {
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .title("Login")
            .padding(Padding::new(1, 1, 0, 0));
        let inner = outer.inner(rect);
        frame.render_widget(outer, rect);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        frame.render_widget(
            self.field(LoginField::Email, "Email", self.email.to_string()),
            layout[0],
        );
        frame.render_widget(
            self.field(
                LoginField::Password,
                "Password",
                "*".repeat(self.password.chars().count()),
            ),
            layout[1],
        );

        let mut button = Paragraph::new("[ Login ]  (Enter)");
        if loading {
            button = Paragraph::new("Logging in...").style(Style::default().fg(Color::DarkGray));
        }
        frame.render_widget(button, layout[2]);
    }
}
