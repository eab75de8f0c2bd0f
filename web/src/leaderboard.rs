use flipmatch_protocol::{FeedEvent, LeaderboardQuery, ScoreRecord};
use futures_util::StreamExt;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Base URL of the score service. Same-origin `/api` unless the page
/// overrides it through `<body data-score-api="...">`.
fn api_base() -> String {
    gloo::utils::body()
        .get_attribute("data-score-api")
        .unwrap_or_else(|| "/api".to_string())
}

fn scores_url() -> String {
    format!("{}/scores", api_base())
}

fn feed_url() -> String {
    let base = api_base();
    if let Some(rest) = base.strip_prefix("https://") {
        return format!("wss://{}/scores/feed", rest);
    }
    if let Some(rest) = base.strip_prefix("http://") {
        return format!("ws://{}/scores/feed", rest);
    }

    let location = gloo::utils::window().location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location.host().unwrap_or_default();
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    format!("{}://{}{}/scores/feed", scheme, host, base)
}

/// Insert one row into the remote score table. Callers treat any error as a
/// transient notification; gameplay never blocks on it.
pub(crate) async fn submit_score(record: &ScoreRecord) -> anyhow::Result<()> {
    use gloo::net::http::Request;

    let response = Request::post(&scores_url()).json(record)?.send().await?;
    if !response.ok() {
        anyhow::bail!("score service returned {}", response.status());
    }
    Ok(())
}

async fn fetch_leaderboard(query: &LeaderboardQuery) -> anyhow::Result<Vec<ScoreRecord>> {
    use gloo::net::http::Request;

    let response = Request::get(&scores_url())
        .query(query.to_pairs())
        .send()
        .await?;
    if !response.ok() {
        anyhow::bail!("score service returned {}", response.status());
    }
    Ok(response.json().await?)
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct LeaderboardProps {
    pub mode: String,
    pub grid_size: String,
}

pub(crate) enum LeaderboardMsg {
    Loaded(Vec<ScoreRecord>),
    LoadFailed(String),
    FeedInsert(ScoreRecord),
}

/// Top-scores panel: one filtered fetch per configuration plus a live
/// insert feed. Network failures only ever degrade this panel.
pub(crate) struct LeaderboardView {
    entries: Vec<ScoreRecord>,
    loading: bool,
    error: Option<String>,
}

impl LeaderboardView {
    fn start_fetch(ctx: &Context<Self>) {
        let query = LeaderboardQuery {
            mode: Some(ctx.props().mode.clone()),
            grid_size: Some(ctx.props().grid_size.clone()),
            limit: None,
        };
        let link = ctx.link().clone();
        spawn_local(async move {
            match fetch_leaderboard(&query).await {
                Ok(entries) => link.send_message(LeaderboardMsg::Loaded(entries)),
                Err(err) => {
                    log::warn!("leaderboard load failed: {:#}", err);
                    link.send_message(LeaderboardMsg::LoadFailed(err.to_string()));
                }
            }
        });
    }

    fn open_feed(ctx: &Context<Self>) {
        use gloo::net::websocket::{Message, futures::WebSocket};

        let url = feed_url();
        let mut ws = match WebSocket::open(&url) {
            Ok(ws) => ws,
            Err(err) => {
                log::warn!("score feed unavailable at {}: {:?}", url, err);
                return;
            }
        };

        let link = ctx.link().clone();
        spawn_local(async move {
            while let Some(message) = ws.next().await {
                match message {
                    Ok(Message::Text(text)) => match serde_json::from_str(&text) {
                        Ok(FeedEvent::Insert { record }) => {
                            link.send_message(LeaderboardMsg::FeedInsert(record));
                        }
                        Err(err) => log::warn!("unparseable feed message: {}", err),
                    },
                    Ok(Message::Bytes(_)) => {}
                    Err(err) => {
                        log::warn!("score feed closed: {:?}", err);
                        break;
                    }
                }
            }
        });
    }

    fn matches_filter(&self, ctx: &Context<Self>, record: &ScoreRecord) -> bool {
        record.mode == ctx.props().mode && record.grid_size == ctx.props().grid_size
    }

    /// Same dedupe key the service uses for rows without an id.
    fn entry_key(record: &ScoreRecord) -> String {
        let stamp = record
            .created_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default();
        format!("{}-{}", record.player_name, stamp)
    }
}

impl Component for LeaderboardView {
    type Message = LeaderboardMsg;
    type Properties = LeaderboardProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self::start_fetch(ctx);
        Self::open_feed(ctx);
        Self {
            entries: Vec::new(),
            loading: true,
            error: None,
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.loading = true;
        self.error = None;
        Self::start_fetch(ctx);
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use LeaderboardMsg::*;

        match msg {
            Loaded(entries) => {
                self.entries = entries;
                self.loading = false;
                self.error = None;
                true
            }
            LoadFailed(message) => {
                self.loading = false;
                self.error = Some(message);
                true
            }
            FeedInsert(record) => {
                if !self.matches_filter(ctx, &record) {
                    return false;
                }
                self.entries.insert(0, record);
                let mut seen = Vec::new();
                self.entries.retain(|entry| {
                    let key = Self::entry_key(entry);
                    if seen.contains(&key) {
                        false
                    } else {
                        seen.push(key);
                        true
                    }
                });
                self.entries
                    .sort_by(|a, b| b.score.cmp(&a.score));
                self.entries
                    .truncate(LeaderboardQuery::DEFAULT_LIMIT as usize);
                true
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class="leaderboard">
                <h3>{"Leaderboard"}</h3>
                if self.loading {
                    <div class="leaderboard-status">{"Loading..."}</div>
                } else if let Some(error) = &self.error {
                    <div class="leaderboard-status error">
                        {format!("Error loading leaderboard: {}", error)}
                    </div>
                } else if self.entries.is_empty() {
                    <div class="leaderboard-status">
                        {"No scores yet — play a game to add one."}
                    </div>
                } else {
                    <ol>
                        {
                            for self.entries.iter().map(|entry| html! {
                                <li key={Self::entry_key(entry)}>
                                    <strong>{entry.player_name.clone()}</strong>
                                    <span>{format!("— {}", entry.score)}</span>
                                </li>
                            })
                        }
                    </ol>
                }
            </div>
        }
    }
}
