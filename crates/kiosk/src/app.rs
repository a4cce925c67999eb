use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};
use visitor_pass::{Effect, FormController, Intent, InternalEvent, TaskExecutor, Ticker};

use crate::{
    action::Action,
    components::{header::Header, pass::PassPanel, registration::Registration, Component},
    config::Config,
    tui::{Event, EventResponse, Tui},
};

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

pub struct App {
    pub config: Config,
    form: FormController,
    executor: TaskExecutor,
    /// Live pass countdown, if any.
    ticker: Option<Ticker>,
    header: Header,
    registration: Registration,
    pass: PassPanel,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
    pub should_quit: bool,
    pub should_suspend: bool,
}

impl App {
    /// Build the app and its task executor. Must run inside a Tokio runtime.
    pub fn new(config: Config) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let executor = TaskExecutor::new(config.http_endpoint()?, event_tx);
        forward_task_events(event_rx, action_tx.clone());

        Ok(Self {
            header: Header::new(&config.ui.title, &config.ui.subtitle),
            config,
            form: FormController::new(),
            executor,
            ticker: None,
            registration: Registration::new(),
            pass: PassPanel::new(),
            action_tx,
            action_rx,
            should_quit: false,
            should_suspend: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(self.config.ui.tick_rate)
            .frame_rate(self.config.ui.frame_rate);
        tui.enter()?;
        info!(url = %self.config.http_endpoint()?.url(), "kiosk ready");

        loop {
            if let Some(event) = tui.next().await {
                self.handle_event(event)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                match action {
                    Action::Render => self.draw(&mut tui)?,
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        self.draw(&mut tui)?;
                    }
                    Action::ClearScreen => tui.terminal.clear()?,
                    _ => {}
                }
                self.update(action)?;
            }

            if self.should_suspend {
                tui.suspend()?;
                self.action_tx.send(Action::Resume)?;
                self.action_tx.send(Action::ClearScreen)?;
                tui.resume()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }

        let effects = self.form.reduce(Intent::Teardown);
        self.apply(effects);
        tui.exit()?;
        Ok(())
    }

    /// Route a terminal event through the components, then the global keys.
    fn handle_event(&mut self, event: Event) -> Result<()> {
        let form = &self.form;
        let mut stopped = false;
        for component in [
            &mut self.registration as &mut dyn Component,
            &mut self.pass,
            &mut self.header,
        ] {
            if event == Event::Init {
                component.init(form)?;
                continue;
            }
            match component.handle_events(&event, form)? {
                Some(EventResponse::Stop(action)) => {
                    self.action_tx.send(action)?;
                    stopped = true;
                    break;
                }
                Some(EventResponse::Continue(action)) => self.action_tx.send(action)?,
                None => {}
            }
        }
        if stopped {
            return Ok(());
        }

        match event {
            Event::Tick => self.action_tx.send(Action::Tick)?,
            Event::Render => self.action_tx.send(Action::Render)?,
            Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
            Event::Error => self.action_tx.send(Action::Error("terminal input error".into()))?,
            Event::Key(key) => {
                if let Some(action) = global_key(key) {
                    self.action_tx.send(action)?;
                }
            }
            Event::Init => {}
        }
        Ok(())
    }

    /// Apply an action to the controller, then let the components react.
    fn update(&mut self, action: Action) -> Result<()> {
        if !matches!(action, Action::Tick | Action::Render) {
            debug!(%action, "action");
        }
        match &action {
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => self.should_suspend = false,
            Action::Error(msg) => error!("{msg}"),
            Action::Edit(field, value) => self.dispatch(Intent::Edit {
                field: *field,
                value: value.clone(),
            }),
            Action::Submit => self.dispatch(Intent::Submit),
            Action::TaskStarted(id, label) => debug!(id, %label, "task started"),
            Action::TaskFinished(id, result) => {
                debug!(id, "task finished");
                self.dispatch(Intent::SubmissionFinished(result.clone()));
                if let Some(err) = self.form.error() {
                    warn!(id, kind = ?err.kind(), "registration not completed");
                }
            }
            Action::CountdownTick(id) => {
                if self.ticker.as_ref().map(Ticker::id) == Some(*id) {
                    self.dispatch(Intent::Tick);
                } else {
                    debug!(?id, "tick from a replaced ticker dropped");
                }
            }
            _ => {}
        }

        let form = &self.form;
        for component in [
            &mut self.registration as &mut dyn Component,
            &mut self.pass,
            &mut self.header,
        ] {
            if let Some(follow_up) = component.update(&action, form)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, intent: Intent) {
        let effects = self.form.reduce(intent);
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Async(task) => {
                    let id = self.executor.spawn(task);
                    debug!(id, "task scheduled");
                }
                Effect::StartCountdown { seconds } => {
                    if let Some(old) = self.ticker.take() {
                        old.cancel();
                    }
                    let ticker = Ticker::start(
                        COUNTDOWN_PERIOD,
                        self.action_tx.clone(),
                        Action::CountdownTick,
                    );
                    info!(seconds, ticker = ?ticker.id(), "pass countdown started");
                    self.ticker = Some(ticker);
                }
                Effect::StopCountdown => {
                    if let Some(ticker) = self.ticker.take() {
                        ticker.cancel();
                        debug!(ticker = ?ticker.id(), "pass countdown stopped");
                    }
                }
                Effect::Log(msg) => debug!("{msg}"),
            }
        }
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        let action_tx = self.action_tx.clone();
        tui.draw(|frame| {
            if let Err(err) = self.render(frame) {
                let _ = action_tx.send(Action::Error(format!("Failed to draw: {err:?}")));
            }
        })?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        let [header_area, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(frame.area());
        let [form_area, pass_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(body);

        self.header.draw(frame, header_area, &self.form)?;
        self.registration.draw(frame, form_area, &self.form)?;
        self.pass.draw(frame, pass_area, &self.form)?;
        Ok(())
    }
}

/// Keys that work regardless of focus.
fn global_key(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('z') if ctrl => Some(Action::Suspend),
        _ => None,
    }
}

/// Turn executor notifications into actions on the app channel.
fn forward_task_events(
    mut event_rx: UnboundedReceiver<InternalEvent>,
    action_tx: UnboundedSender<Action>,
) {
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let action = match event {
                InternalEvent::TaskStarted { id, label } => Action::TaskStarted(id, label),
                InternalEvent::TaskFinished { id, result } => Action::TaskFinished(id, result),
            };
            if action_tx.send(action).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use visitor_pass::{Field, PASS_TTL_SECS};
    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    async fn app_against(server: &MockServer) -> App {
        let dir = tempfile::tempdir().unwrap();
        let uri = server.uri();
        let config = Config::load(dir.path(), Some(uri.as_str()), Some(HashMap::new())).unwrap();
        App::new(config).unwrap()
    }

    async fn accepting_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })),
            )
            .mount(&server)
            .await;
        server
    }

    fn fill(app: &mut App) {
        for (field, value) in [
            (Field::FirstName, "ana"),
            (Field::LastName, "cruz"),
            (Field::Address, "lapasan"),
            (Field::Purpose, "visit"),
        ] {
            app.update(Action::Edit(field, value.into())).unwrap();
        }
    }

    /// Process queued actions until `done` matches one of them.
    async fn pump_until(app: &mut App, done: impl Fn(&Action) -> bool) {
        loop {
            let action = app.action_rx.recv().await.expect("channel open");
            let finished = done(&action);
            app.update(action).unwrap();
            if finished {
                return;
            }
        }
    }

    #[tokio::test]
    async fn registration_starts_countdown() {
        let server = accepting_server().await;
        let mut app = app_against(&server).await;
        fill(&mut app);

        app.update(Action::Submit).unwrap();
        assert!(app.form.is_submitting());
        pump_until(&mut app, |a| matches!(a, Action::TaskFinished(..))).await;

        assert!(app.ticker.is_some());
        assert_eq!(app.form.expiry().remaining(), PASS_TTL_SECS);
        assert_eq!(app.registration.value(Field::FirstName), "");
        assert_eq!(app.form.pass_payload().as_deref(), Some("Ana Cruz"));
    }

    #[tokio::test]
    async fn ticks_from_replaced_ticker_are_ignored() {
        let server = accepting_server().await;
        let mut app = app_against(&server).await;
        fill(&mut app);
        app.update(Action::Submit).unwrap();
        pump_until(&mut app, |a| matches!(a, Action::TaskFinished(..))).await;

        let (tx, _rx) = mpsc::unbounded_channel();
        let stale = Ticker::start(Duration::from_secs(60), tx, |id| id);
        app.update(Action::CountdownTick(stale.id())).unwrap();
        assert_eq!(app.form.expiry().remaining(), PASS_TTL_SECS);

        let live = app.ticker.as_ref().map(Ticker::id).unwrap();
        app.update(Action::CountdownTick(live)).unwrap();
        assert_eq!(app.form.expiry().remaining(), PASS_TTL_SECS - 1);
    }

    #[tokio::test]
    async fn second_registration_replaces_the_countdown() {
        let server = accepting_server().await;
        let mut app = app_against(&server).await;
        fill(&mut app);
        app.update(Action::Submit).unwrap();
        pump_until(&mut app, |a| matches!(a, Action::TaskFinished(..))).await;

        let first = app.ticker.as_ref().unwrap();
        let (first_id, first_token) = (first.id(), first.cancellation_token());
        app.update(Action::CountdownTick(first_id)).unwrap();
        assert_eq!(app.form.expiry().remaining(), PASS_TTL_SECS - 1);

        fill(&mut app);
        app.update(Action::Submit).unwrap();
        pump_until(&mut app, |a| matches!(a, Action::TaskFinished(..))).await;

        assert!(first_token.is_cancelled());
        let second = app.ticker.as_ref().unwrap();
        assert_ne!(second.id(), first_id);
        assert!(!second.is_cancelled());
        assert_eq!(app.form.expiry().remaining(), PASS_TTL_SECS);
    }

    #[tokio::test]
    async fn teardown_cancels_the_countdown() {
        let server = accepting_server().await;
        let mut app = app_against(&server).await;
        fill(&mut app);
        app.update(Action::Submit).unwrap();
        pump_until(&mut app, |a| matches!(a, Action::TaskFinished(..))).await;
        assert!(app.ticker.is_some());

        app.dispatch(Intent::Teardown);
        assert!(app.ticker.is_none());
    }

    #[tokio::test]
    async fn quit_and_suspend_keys() {
        let server = accepting_server().await;
        let mut app = app_against(&server).await;

        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
            .unwrap();
        let action = app.action_rx.recv().await.unwrap();
        assert_eq!(action, Action::Quit);
        app.update(action).unwrap();
        assert!(app.should_quit);

        assert_eq!(
            global_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL)),
            Some(Action::Suspend)
        );
        assert_eq!(
            global_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE)),
            None
        );
    }

    #[tokio::test]
    async fn typed_keys_reach_the_draft() {
        let server = accepting_server().await;
        let mut app = app_against(&server).await;

        for c in "ana".chars() {
            app.handle_event(Event::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )))
            .unwrap();
        }
        while let Ok(action) = app.action_rx.try_recv() {
            app.update(action).unwrap();
        }

        assert_eq!(app.form.draft().first_name, "Ana");
        assert_eq!(app.registration.value(Field::FirstName), "Ana");
    }
}
