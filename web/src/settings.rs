use flipmatch_core::{CardCount, GameConfig, GameMode, GridSize};
use serde::{Deserialize, Serialize};
use yew::prelude::*;

use crate::theme::Theme;
use crate::utils::*;

/// Grid sizes offered by the setup screen.
pub(crate) const GRID_CHOICES: [GridSize; 3] = [
    GridSize::new(4, 3),
    GridSize::new(4, 4),
    GridSize::new(6, 4),
];

/// Secret-card counts offered in secret mode.
pub(crate) const SECRET_CHOICES: [CardCount; 3] = [0, 2, 4];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub game: GameConfig,
    pub enable_sound: bool,
    pub enable_confetti: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            enable_sound: true,
            enable_confetti: true,
        }
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "flipmatch:settings:v1";
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub value: Settings,
    #[prop_or_default]
    pub error: Option<String>,
    pub on_change: Callback<Settings>,
    pub on_start: Callback<()>,
}

#[function_component(SettingsView)]
pub(crate) fn settings_view(props: &SettingsProps) -> Html {
    let value = props.value.clone();
    let game = value.game;
    let total = game.total_cards();

    let pick_grid = |grid: GridSize| {
        let on_change = props.on_change.clone();
        let value = value.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = value.clone();
            next.game = GameConfig::new(grid, next.game.mode, next.game.secret_cards);
            on_change.emit(next);
        })
    };

    let pick_mode = |mode: GameMode| {
        let on_change = props.on_change.clone();
        let value = value.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = value.clone();
            next.game = GameConfig::new(next.game.grid, mode, next.game.secret_cards);
            on_change.emit(next);
        })
    };

    let pick_secret = |count: CardCount| {
        let on_change = props.on_change.clone();
        let value = value.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = value.clone();
            next.game = GameConfig::new(next.game.grid, next.game.mode, count);
            on_change.emit(next);
        })
    };

    let toggle_sound = {
        let on_change = props.on_change.clone();
        let value = value.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = value.clone();
            next.enable_sound = !next.enable_sound;
            on_change.emit(next);
        })
    };

    let toggle_confetti = {
        let on_change = props.on_change.clone();
        let value = value.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = value.clone();
            next.enable_confetti = !next.enable_confetti;
            on_change.emit(next);
        })
    };

    let on_start = {
        let on_start = props.on_start.clone();
        Callback::from(move |_: MouseEvent| on_start.emit(()))
    };

    let choice_class = |selected: bool| classes!("choice", selected.then_some("selected"));

    html! {
        <dialog id="settings" open={props.open}>
            <article>
                <h2>{"Select Grid Size & Mode"}</h2>
                <p class="hint">{format!("Total cards: {}", total)}</p>
                if let Some(error) = &props.error {
                    <p class="config-error">{error.clone()}</p>
                }
                <section class="choices">
                    {
                        for GRID_CHOICES.into_iter().map(|grid| html! {
                            <button
                                class={choice_class(game.grid == grid)}
                                onclick={pick_grid(grid)}
                            >{grid.to_string()}</button>
                        })
                    }
                </section>
                <section class="choices">
                    <button
                        class={choice_class(game.mode == GameMode::Classic)}
                        onclick={pick_mode(GameMode::Classic)}
                    >{"Classic"}</button>
                    <button
                        class={choice_class(game.mode == GameMode::Secret)}
                        onclick={pick_mode(GameMode::Secret)}
                    >{"Secret Cards"}</button>
                </section>
                if game.mode == GameMode::Secret {
                    <section class="choices">
                        <span class="choices-label">{"Secret cards:"}</span>
                        {
                            for SECRET_CHOICES.into_iter().map(|count| html! {
                                <button
                                    class={choice_class(game.secret_cards == count)}
                                    onclick={pick_secret(count)}
                                >{count.to_string()}</button>
                            })
                        }
                    </section>
                }
                <section class="choices">
                    <button class={choice_class(value.enable_sound)} onclick={toggle_sound}>
                        {"Sound"}
                    </button>
                    <button class={choice_class(value.enable_confetti)} onclick={toggle_confetti}>
                        {"Confetti"}
                    </button>
                </section>
                <section class="choices">
                    {
                        for [Theme::Auto, Theme::Light, Theme::Dark].into_iter().map(|theme| html! {
                            <a
                                href="#"
                                onclick={Callback::from(move |e: MouseEvent| {
                                    e.prevent_default();
                                    theme.apply();
                                })}
                            >{theme.label()}</a>
                        })
                    }
                </section>
                <footer>
                    <button class="start-btn" onclick={on_start}>{"Start Game"}</button>
                </footer>
            </article>
        </dialog>
    }
}
