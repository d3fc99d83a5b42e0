use anyhow::Result;

use hikesmart::api::ApiClient;
use hikesmart::app::App;
use hikesmart::config::Config;
use hikesmart::{handler, tui, ui, worker};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();
    let client = ApiClient::new(&config.resolve_base_url());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, client).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, client: ApiClient) -> Result<()> {
    let mut app = App::new();
    let mut events = tui::EventHandler::new();
    let tx = events.sender();

    // Gate the UI behind the splash until the backend answers.
    tokio::spawn(worker::poll_ready(client.clone(), tx.clone()));

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(&mut app, &client, &tx, event)?;
        } else {
            break;
        }
    }

    Ok(())
}
