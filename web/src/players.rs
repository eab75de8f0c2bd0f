use flipmatch_core::{Player, ScoreValue, Scores};
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
struct PlayerBadgeProps {
    player: Player,
    score: ScoreValue,
    #[prop_or_default]
    active: bool,
}

#[function_component(PlayerBadge)]
fn player_badge(props: &PlayerBadgeProps) -> Html {
    let variant = match props.player {
        Player::A => "player-a",
        Player::B => "player-b",
    };
    let class = classes!("player", variant, props.active.then_some("active"));

    html! {
        <div {class}>
            <h2>{props.player.label()}</h2>
            <p class="score">{format!("Score: {}", props.score)}</p>
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct PlayersProps {
    pub scores: Scores,
    pub current: Player,
    #[prop_or_default]
    pub game_over: bool,
}

#[function_component(PlayersPanel)]
pub(crate) fn players_panel(props: &PlayersProps) -> Html {
    let active = |player: Player| !props.game_over && props.current == player;

    html! {
        <div class="players-card">
            <PlayerBadge
                player={Player::A}
                score={props.scores.get(Player::A)}
                active={active(Player::A)}
            />
            <div class="versus">{"VS"}</div>
            <PlayerBadge
                player={Player::B}
                score={props.scores.get(Player::B)}
                active={active(Player::B)}
            />
        </div>
    }
}
