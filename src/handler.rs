use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::app::App;
use crate::tui::AppEvent;
use crate::worker;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(
    app: &mut App,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<AppEvent>,
    event: AppEvent,
) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, client, tx, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::Backend(msg) => {
            app.apply(msg);
        }
    }
    Ok(())
}

fn handle_key(
    app: &mut App,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<AppEvent>,
    key: KeyEvent,
) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Splash screen: everything else waits for the backend.
    if !app.backend_ready {
        return;
    }

    match key.code {
        KeyCode::Enter => {
            if let Some(request) = app.submit() {
                let client = client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    worker::run_search(client, request, tx).await;
                });
            }
        }

        // Header-logo equivalent: back to the welcome view.
        KeyCode::Esc => {
            app.reset();
        }

        // Results scrolling; arrows only, letters belong to the input.
        KeyCode::Up => app.scroll_results_up(),
        KeyCode::Down => app.scroll_results_down(),

        // Welcome shortcuts pre-fill the input without searching.
        KeyCode::Char(c @ '1'..='3') if app.show_welcome() && app.preference.is_empty() => {
            app.preset(c as usize - '1' as usize);
        }

        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.preference, app.cursor);
                app.preference.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.preference.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.preference, app.cursor);
                app.preference.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.preference.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.preference.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.preference, app.cursor);
            app.preference.insert(byte_pos, c);
            app.cursor += 1;
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::PRESET_PREFERENCES;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ready_app() -> App {
        let mut app = App::new();
        app.backend_ready = true;
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        let client = ApiClient::new("http://localhost:5000");
        let (tx, _rx) = mpsc::unbounded_channel();
        handle_key(app, &client, &tx, key(code));
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut app = ready_app();
        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('i'));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('ä'));

        assert_eq!(app.preference, "häi");
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut app = ready_app();
        app.preference = "trail".to_string();
        app.cursor = 5;

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.preference, "trai");
        assert_eq!(app.cursor, 4);
    }

    #[test]
    fn keys_are_ignored_while_splash_is_up() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Enter);

        assert!(app.preference.is_empty());
        assert!(!app.is_loading());
    }

    #[test]
    fn digit_shortcut_fills_preset_only_on_empty_welcome_input() {
        let mut app = ready_app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.preference, PRESET_PREFERENCES[1]);

        // With text present, digits are ordinary input.
        app.preference = "hike ".to_string();
        app.cursor = 5;
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.preference, "hike 2");
    }

    #[test]
    fn ctrl_c_quits_even_before_ready() {
        let mut app = App::new();
        let client = ApiClient::new("http://localhost:5000");
        let (tx, _rx) = mpsc::unbounded_channel();
        handle_key(
            &mut app,
            &client,
            &tx,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
