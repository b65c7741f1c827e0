use crate::params::{
    FindStationParams, PlayDefaultParams, PlayParams, PlayVlcParams, RcParams, StreamParams,
    VolumeChangeParams, VolumeSetParams,
};
use anyhow::Result;
use pmoconfig::Config;
use pmoplayer::{
    ControlResponse, EnvironmentReport, PlayerConfigExt, RcClient, RcEndpoint,
    SystemPlaybackController, VlcLaunchOptions,
};
use pmoradiobrowser::{RadioBrowserClient, RadioBrowserConfigExt, SearchQuery};
use pmostream::StreamResolver;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Defaults applied when a tool call omits a parameter
#[derive(Debug, Clone)]
pub struct ToolDefaults {
    pub search_limit: u32,
    pub force_playlist: bool,
    pub rc_endpoint: RcEndpoint,
    pub control_timeout: Duration,
}

impl ToolDefaults {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            search_limit: config.get_radiobrowser_default_limit()?,
            force_playlist: config.get_player_force_playlist()?,
            rc_endpoint: config.get_player_rc_endpoint()?,
            control_timeout: config.get_player_control_timeout()?,
        })
    }
}

/// MCP server exposing station search, stream resolution and local playback
#[derive(Clone)]
pub struct RadioServer {
    tool_router: ToolRouter<Self>,
    directory: RadioBrowserClient,
    resolver: StreamResolver,
    player: Arc<SystemPlaybackController>,
    defaults: ToolDefaults,
}

#[tool_router]
impl RadioServer {
    pub fn new(
        directory: RadioBrowserClient,
        resolver: StreamResolver,
        player: SystemPlaybackController,
        defaults: ToolDefaults,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            directory,
            resolver,
            player: Arc::new(player),
            defaults,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            RadioBrowserClient::from_config(config).await?,
            StreamResolver::from_config(config)?,
            SystemPlaybackController::from_config(config)?,
            ToolDefaults::from_config(config)?,
        ))
    }

    #[tool(description = "Search the Radio Browser directory for stations by name, \
                          optionally filtered by country and tag. Prefer `url_resolved` when playing.")]
    async fn find_station(
        &self,
        Parameters(params): Parameters<FindStationParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut query = SearchQuery::new(params.query)
            .limit(params.limit.unwrap_or(self.defaults.search_limit));
        if let Some(country) = params.country {
            query = query.country(country);
        }
        if let Some(tag) = params.tag {
            query = query.tag(tag);
        }

        match self.directory.search(&query).await {
            Ok(stations) => {
                info!("find_station: {} result(s) for '{}'", stations.len(), query.name);
                json_result(&stations)
            }
            Err(e) => {
                warn!("find_station failed: {}", e);
                Ok(error_result(format!("Station search failed: {}", e)))
            }
        }
    }

    #[tool(description = "Resolve a station URL (redirect, .m3u or .pls playlist) to a directly \
                          playable audio stream URL. Returns input_url, resolved_url, content_type and notes.")]
    async fn get_playable_stream(
        &self,
        Parameters(params): Parameters<StreamParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.resolver.resolve(&params.url).await {
            Ok(result) => json_result(&result),
            Err(e) => {
                warn!("get_playable_stream failed for {}: {}", params.url, e);
                Ok(error_result(format!("Cannot resolve {}: {}", params.url, e)))
            }
        }
    }

    #[tool(description = "Play a stream URL. backend=auto (default) opens it with the OS default \
                          handler on desktops and falls back to VLC; headless machines use VLC. \
                          backend=default or backend=vlc force one backend.")]
    async fn play(&self, Parameters(params): Parameters<PlayParams>) -> Result<CallToolResult, McpError> {
        let player = Arc::clone(&self.player);
        let force_playlist = params.force_playlist.unwrap_or(self.defaults.force_playlist);
        let backend = params.backend.into();
        let result = blocking(move || player.play(&params.url, backend, force_playlist)).await?;
        json_result(&result)
    }

    #[tool(description = "Open a stream with the OS default handler. By default a temporary .m3u \
                          is opened, which is more likely to start a media player than a browser.")]
    async fn play_default(
        &self,
        Parameters(params): Parameters<PlayDefaultParams>,
    ) -> Result<CallToolResult, McpError> {
        let player = Arc::clone(&self.player);
        let force_playlist = params.force_playlist.unwrap_or(self.defaults.force_playlist);
        let result = blocking(move || player.play_default(&params.url, force_playlist)).await?;
        json_result(&result)
    }

    #[tool(description = "Launch VLC on a stream URL and return immediately. with_rc=true exposes \
                          VLC's RC interface on rc_host:rc_port for the vlc_* tools.")]
    async fn play_vlc(
        &self,
        Parameters(params): Parameters<PlayVlcParams>,
    ) -> Result<CallToolResult, McpError> {
        let control = params
            .with_rc
            .then(|| self.endpoint(params.rc_host.clone(), params.rc_port));
        let options = VlcLaunchOptions {
            vlc_path: params.vlc_path.map(PathBuf::from),
            extra_args: params.extra_args.unwrap_or_default(),
            control,
        };
        let player = Arc::clone(&self.player);
        let result = blocking(move || player.play_vlc(&params.url, &options)).await?;
        json_result(&result)
    }

    #[tool(description = "Toggle pause/play on a VLC instance started with its RC interface.")]
    async fn vlc_pause(&self, Parameters(params): Parameters<RcParams>) -> Result<CallToolResult, McpError> {
        let rc = self.rc_client(params.rc_host, params.rc_port);
        self.control(move || rc.pause()).await
    }

    #[tool(description = "Stop playback in VLC through its RC interface.")]
    async fn vlc_stop(&self, Parameters(params): Parameters<RcParams>) -> Result<CallToolResult, McpError> {
        let rc = self.rc_client(params.rc_host, params.rc_port);
        self.control(move || rc.stop()).await
    }

    #[tool(description = "Set VLC volume in percent (0-100, mapped to VLC's 0-512 scale).")]
    async fn vlc_volume_set(
        &self,
        Parameters(params): Parameters<VolumeSetParams>,
    ) -> Result<CallToolResult, McpError> {
        let rc = self.rc_client(params.rc_host, params.rc_port);
        let percent = params.percent;
        self.control(move || rc.volume_set(percent)).await
    }

    #[tool(description = "Change VLC volume by +/- percent. Positive raises, negative lowers.")]
    async fn vlc_volume_change(
        &self,
        Parameters(params): Parameters<VolumeChangeParams>,
    ) -> Result<CallToolResult, McpError> {
        let rc = self.rc_client(params.rc_host, params.rc_port);
        let delta = params.delta;
        self.control(move || rc.volume_change(delta)).await
    }

    #[tool(description = "Return the raw output of VLC's RC `status` command.")]
    async fn vlc_status(&self, Parameters(params): Parameters<RcParams>) -> Result<CallToolResult, McpError> {
        let rc = self.rc_client(params.rc_host, params.rc_port);
        self.control(move || rc.status()).await
    }

    #[tool(description = "Probe the machine to help choose a playback backend: \
                          has_gui, vlc_available, platform and os.")]
    async fn check_players(&self) -> Result<CallToolResult, McpError> {
        let player = Arc::clone(&self.player);
        let report = blocking(move || EnvironmentReport::probe(player.environment())).await?;
        json_result(&report)
    }
}

impl RadioServer {
    fn endpoint(&self, host: Option<String>, port: Option<u16>) -> RcEndpoint {
        RcEndpoint::new(
            host.unwrap_or_else(|| self.defaults.rc_endpoint.host.clone()),
            port.unwrap_or(self.defaults.rc_endpoint.port),
        )
    }

    fn rc_client(&self, host: Option<String>, port: Option<u16>) -> RcClient {
        RcClient::new(self.endpoint(host, port)).with_timeout(self.defaults.control_timeout)
    }

    async fn control<F>(&self, exchange: F) -> Result<CallToolResult, McpError>
    where
        F: FnOnce() -> ControlResponse + Send + 'static,
    {
        let response = blocking(exchange).await?;
        json_result(&response)
    }
}

#[tool_handler]
impl ServerHandler for RadioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PMORadio - internet radio discovery and local playback\n\n\
                Typical flow:\n\
                1. find_station: search the Radio Browser directory\n\
                2. get_playable_stream: turn a station URL into a direct audio stream\n\
                3. play: start playback (auto picks the OS handler or VLC)\n\n\
                To control playback afterwards, start VLC with play_vlc(with_rc=true) \
                and use vlc_pause, vlc_stop, vlc_volume_set, vlc_volume_change and vlc_status.\n\
                check_players reports whether a GUI and VLC are available."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

async fn blocking<T, F>(task: F) -> Result<T, McpError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| McpError::internal_error(format!("Blocking task failed: {}", e), None))
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to encode result: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn error_result(message: String) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message)])
}
