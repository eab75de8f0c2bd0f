use flipmatch_core::{
    Card, CardIndex, CardState, ClickOutcome, MatchResult, MatchSession, PendingToken, Player,
};
use flipmatch_protocol::ScoreRecord;
use gloo::timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::effects::{self, SoundCue};
use crate::leaderboard::{self, LeaderboardView};
use crate::players::PlayersPanel;
use crate::settings::{Settings, SettingsView};
use crate::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CardClicked(CardIndex),
    PendingElapsed(PendingToken),
    NewGame,
    ToggleSettings,
    UpdateSettings(Settings),
    StartGame,
    NameInput(String),
    SubmitScore,
    SubmitFinished(Result<(), String>),
    DismissToast,
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum SubmitState {
    Idle,
    Sending,
    Done,
}

/// The one browser timer backing the engine's deferred-task slot. Dropping
/// the handle cancels the callback; a late firing dies on the token check.
#[derive(Debug)]
struct PendingTimer {
    token: PendingToken,
    _timeout: Timeout,
}

/// Submission row for a finished session: the winner's name slot plus their
/// total, tagged with the configuration it was earned under.
fn build_score_record(player_name: &str, session: &MatchSession) -> Option<ScoreRecord> {
    let (_, score) = session.final_standing()?;
    let config = session.config();
    Some(ScoreRecord {
        player_name: player_name.trim().to_string(),
        score: u32::from(score),
        mode: config.mode.as_str().to_string(),
        grid_size: config.grid.to_string(),
        created_at: None,
    })
}

#[derive(Debug)]
pub(crate) struct GameView {
    settings: Settings,
    draft: Settings,
    session: Option<MatchSession>,
    config_error: Option<String>,
    seed: u64,
    pending_timer: Option<PendingTimer>,
    settings_open: bool,
    player_name: String,
    submit_state: SubmitState,
    toast: Option<String>,
}

impl GameView {
    fn start_session(&mut self) {
        self.pending_timer = None;
        self.submit_state = SubmitState::Idle;

        match MatchSession::from_config(self.settings.game, self.seed) {
            Ok(session) => {
                self.session = Some(session);
                self.config_error = None;
            }
            Err(err) => {
                log::error!("cannot start game: {}", err);
                self.session = None;
                self.config_error = Some(err.to_string());
                self.settings_open = true;
            }
        }
    }

    /// Mirror the engine's deferred-task slot onto a real browser timer.
    fn sync_pending_timer(&mut self, ctx: &Context<Self>) {
        let Some(session) = self.session.as_ref() else {
            self.pending_timer = None;
            return;
        };

        match session.pending_task() {
            Some(task) => {
                let token = task.token();
                if self.pending_timer.as_ref().map(|t| t.token) == Some(token) {
                    return;
                }
                let link = ctx.link().clone();
                let millis = task.delay().as_millis() as u32;
                let timeout =
                    Timeout::new(millis, move || link.send_message(Msg::PendingElapsed(token)));
                self.pending_timer = Some(PendingTimer {
                    token,
                    _timeout: timeout,
                });
            }
            None => self.pending_timer = None,
        }
    }

    fn react_to_click(&mut self, outcome: ClickOutcome) {
        match outcome {
            ClickOutcome::Matched { is_final } => {
                if self.settings.enable_sound {
                    effects::play_cue(SoundCue::Match);
                }
                if is_final {
                    if self.settings.enable_confetti {
                        effects::shoot_confetti();
                    }
                    if self.settings.enable_sound {
                        effects::play_cue(SoundCue::Win);
                    }
                }
            }
            ClickOutcome::BombTriggered => {
                if self.settings.enable_sound {
                    effects::play_cue(SoundCue::Bomb);
                }
            }
            _ => {}
        }
    }

    fn submit_score(&mut self, ctx: &Context<Self>) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if self.submit_state != SubmitState::Idle || self.player_name.trim().is_empty() {
            return false;
        }
        let Some(record) = build_score_record(&self.player_name, session) else {
            return false;
        };

        self.submit_state = SubmitState::Sending;
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = leaderboard::submit_score(&record)
                .await
                .map_err(|err| err.to_string());
            link.send_message(Msg::SubmitFinished(result));
        });
        true
    }

    fn view_grid(&self, ctx: &Context<Self>) -> Html {
        let Some(session) = self.session.as_ref() else {
            return html! {};
        };

        let engine = session.engine();
        let locked = engine.is_locked() || session.is_over();
        let mismatched = engine.mismatched_pair();
        let on_click = ctx.link().callback(Msg::CardClicked);
        let style = format!(
            "grid-template-columns: repeat({}, 1fr);",
            session.config().grid.cols
        );

        html! {
            <div class="grid" {style}>
                {
                    for engine.cards().iter().enumerate().map(|(index, card)| {
                        let index = index as CardIndex;
                        let in_mismatch = mismatched
                            .map(|(first, second)| index == first || index == second)
                            .unwrap_or(false);
                        html! {
                            <CardView
                                key={card.id()}
                                {index}
                                card={*card}
                                mismatched={in_mismatch}
                                {locked}
                                on_click={on_click.clone()}
                            />
                        }
                    })
                }
            </div>
        }
    }

    fn view_end_overlay(&self, ctx: &Context<Self>) -> Html {
        let Some(session) = self.session.as_ref() else {
            return html! {};
        };
        let Some(result) = session.result() else {
            return html! {};
        };

        let title = match result {
            MatchResult::Winner(player) => format!("{} Wins 🏆 !", player.label()),
            MatchResult::Tie => "Tie Game!".to_string(),
        };
        let score_line = |player: Player| -> String {
            format!("{}: {}", player.label(), session.scores().get(player))
        };

        let on_name = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::NameInput(input.value())
        });
        let submit_label = match self.submit_state {
            SubmitState::Idle => "Submit Score",
            SubmitState::Sending => "Submitting...",
            SubmitState::Done => "Submitted",
        };
        let submit_disabled = self.submit_state != SubmitState::Idle;

        html! {
            <div class="game-end-overlay">
                <div class="game-end-card">
                    <div class="game-end-title">{title}</div>
                    <div class="game-end-scores">
                        <span>{score_line(Player::A)}</span>
                        <span>{score_line(Player::B)}</span>
                    </div>
                    <div class="submit-row">
                        <input
                            placeholder="Your name"
                            value={self.player_name.clone()}
                            oninput={on_name}
                        />
                        <button
                            disabled={submit_disabled}
                            onclick={ctx.link().callback(|_| Msg::SubmitScore)}
                        >{submit_label}</button>
                    </div>
                    <button
                        class="restart-btn"
                        onclick={ctx.link().callback(|_| Msg::NewGame)}
                    >{"Play Again"}</button>
                    <button
                        class="restart-btn"
                        onclick={ctx.link().callback(|_| Msg::ToggleSettings)}
                    >{"New Game / Change Size"}</button>
                </div>
            </div>
        }
    }

    fn view_toast(&self, ctx: &Context<Self>) -> Html {
        match &self.toast {
            Some(message) => html! {
                <div class="toast" role="status" onclick={ctx.link().callback(|_| Msg::DismissToast)}>
                    {message.clone()}
                </div>
            },
            None => html! {},
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let settings: Settings = LocalOrDefault::local_or_default();
        let mut view = Self {
            draft: settings.clone(),
            settings,
            session: None,
            config_error: None,
            seed: ctx.props().seed.unwrap_or_else(js_random_seed),
            pending_timer: None,
            settings_open: true,
            player_name: String::new(),
            submit_state: SubmitState::Idle,
            toast: None,
        };
        view.start_session();
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            CardClicked(index) => {
                let Some(session) = self.session.as_mut() else {
                    return false;
                };
                match session.handle_click(index) {
                    Ok(outcome) => {
                        self.react_to_click(outcome);
                        self.sync_pending_timer(ctx);
                        outcome.has_update()
                    }
                    Err(err) => {
                        log::error!("click rejected: {}", err);
                        false
                    }
                }
            }
            PendingElapsed(token) => {
                let Some(session) = self.session.as_mut() else {
                    return false;
                };
                let outcome = session.fire_pending(token);
                self.pending_timer = None;
                self.sync_pending_timer(ctx);
                outcome.has_update()
            }
            NewGame => {
                self.seed = js_random_seed();
                self.pending_timer = None;
                self.submit_state = SubmitState::Idle;
                if let Some(session) = self.session.as_mut() {
                    if let Err(err) = session.restart(self.seed) {
                        log::error!("restart failed: {}", err);
                        self.config_error = Some(err.to_string());
                        self.settings_open = true;
                    }
                } else {
                    self.start_session();
                }
                true
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                if self.settings_open {
                    self.draft = self.settings.clone();
                }
                true
            }
            UpdateSettings(draft) => {
                if self.draft != draft {
                    self.draft = draft;
                    true
                } else {
                    false
                }
            }
            StartGame => {
                self.settings = self.draft.clone();
                self.settings.local_save();
                self.seed = js_random_seed();
                self.start_session();
                self.settings_open = self.session.is_none();
                true
            }
            NameInput(name) => {
                self.player_name = name;
                false
            }
            SubmitScore => self.submit_score(ctx),
            SubmitFinished(result) => {
                match result {
                    Ok(()) => {
                        self.submit_state = SubmitState::Done;
                        self.toast = Some("Score submitted!".to_string());
                    }
                    Err(err) => {
                        log::warn!("score submission failed: {}", err);
                        self.submit_state = SubmitState::Idle;
                        self.toast = Some("Couldn't submit score, try again.".to_string());
                    }
                }
                true
            }
            DismissToast => {
                self.toast = None;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (scores, current, game_over) = self
            .session
            .as_ref()
            .map(|session| (session.scores(), session.current_player(), session.is_over()))
            .unwrap_or((Default::default(), Player::A, false));

        html! {
            <div class="flipmatch">
                <header>
                    <h1 class="title">{"Flip-Match"}</h1>
                    <small onclick={ctx.link().callback(|_| Msg::ToggleSettings)}>{"···"}</small>
                </header>
                <PlayersPanel {scores} {current} {game_over} />
                { self.view_grid(ctx) }
                <LeaderboardView
                    mode={self.settings.game.mode.as_str().to_string()}
                    grid_size={self.settings.game.grid.to_string()}
                />
                { self.view_end_overlay(ctx) }
                <SettingsView
                    open={self.settings_open}
                    value={self.draft.clone()}
                    error={self.config_error.clone()}
                    on_change={ctx.link().callback(Msg::UpdateSettings)}
                    on_start={ctx.link().callback(|_| Msg::StartGame)}
                />
                { self.view_toast(ctx) }
            </div>
        }
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    index: CardIndex,
    card: Card,
    #[prop_or_default]
    mismatched: bool,
    #[prop_or_default]
    locked: bool,
    on_click: Callback<CardIndex>,
}

#[function_component(CardView)]
fn card_view(props: &CardProps) -> Html {
    let CardProps {
        index,
        card,
        mismatched,
        locked,
        on_click,
    } = props.clone();

    let state = card.state();
    let class = classes!(
        "card",
        state.is_face_up().then_some("flipped"),
        state.is_settled().then_some("matched"),
        (state == CardState::Used).then_some("used-special"),
        mismatched.then_some("mismatch"),
        locked.then_some("locked"),
    );
    let onclick = Callback::from(move |_: MouseEvent| on_click.emit(index));

    html! {
        <div {class} {onclick}>
            <div class="card-inner">
                <div class="card-front">{card.glyph().to_string()}</div>
                <div class="card-back">{"❓"}</div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipmatch_core::{GameConfig, GameMode, GridSize, MatchEngine};

    fn finished_session() -> MatchSession {
        let cards = vec![
            Card::normal(0, 'a'),
            Card::normal(1, 'a'),
        ];
        let config = GameConfig::new(GridSize::new(2, 1), GameMode::Classic, 0);
        let mut session = MatchSession::new(config, MatchEngine::new(cards, 1));
        session.handle_click(0).unwrap();
        session.handle_click(1).unwrap();
        session
    }

    #[test]
    fn score_record_carries_the_winning_total_and_config() {
        let session = finished_session();

        let record = build_score_record("  Ada ", &session).unwrap();

        assert_eq!(record.player_name, "Ada");
        assert_eq!(record.score, 1);
        assert_eq!(record.mode, "classic");
        assert_eq!(record.grid_size, "2x1");
        assert_eq!(record.created_at, None);
    }

    #[test]
    fn unfinished_sessions_have_no_score_record() {
        let config = GameConfig::default();
        let session = MatchSession::from_config(config, 5).unwrap();

        assert!(build_score_record("Ada", &session).is_none());
    }

    #[test]
    fn settings_persist_under_a_versioned_key() {
        assert_eq!(<Settings as StorageKey>::KEY, "flipmatch:settings:v1");
    }
}
