use crate::models::models::WidgetSnapshot;
use crate::utils::utils::escape_html;

const PLAYERJS_SRC: &str = "https://cdn.embed.ly/player-0.1.0.min.js";

const PAGE_STYLE: &str = r#"
.error { display: none; color: #b00020; }
.error--visible { display: block; }
.video_player__controls button { margin-right: 0.5em; }
"#;

// Binds playerjs to the embedded iframe and relays its events back to the
// widget. `play` is issued once the widget marks the player as playing.
const PAGE_SCRIPT: &str = r#"
(function() {
  var container = document.getElementById('player');
  var playerId = container.getAttribute('data-player-id');

  function post(path) { return fetch(path, { method: 'POST' }); }
  function status() { return fetch('/status').then(function(r) { return r.json(); }); }
  function reload() { window.location.reload(); }

  container.querySelector('.video_player__skip').addEventListener('click', function() {
    post('/skip').then(reload);
  }, false);
  container.querySelector('.video_player__back').addEventListener('click', function() {
    post('/back').then(reload);
  }, false);

  var iframe = container.querySelector('.video_player__video iframe');
  if (!iframe || !playerId || !window.playerjs) { return; }
  var embedded = new playerjs.Player(iframe);

  embedded.on('ready', function() {
    post('/player/' + playerId + '/ready').then(status).then(function(s) {
      if (s.player_state === 'playing') { embedded.play(); }
    });
  });

  embedded.on('ended', function() {
    var index = container.getAttribute('data-playlist-index');
    post('/player/' + playerId + '/ended').then(function() {
      var poll = setInterval(function() {
        status().then(function(s) {
          var moved = s.player_id !== playerId || String(s.playlist_index) !== index;
          if (moved || s.error) { clearInterval(poll); reload(); }
        });
      }, 500);
    });
  });
})();
"#;

/// Renders the widget container. Title and description are escaped, the
/// embed markup is inserted as-is.
pub fn render_dashboard(snapshot: &WidgetSnapshot) -> String {
    let player_id = snapshot
        .player_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    let (error_class, error_text) = match &snapshot.error {
        Some(message) => ("error error--visible", escape_html(message)),
        None => ("error", String::new()),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{page_title}</title>
<style>{PAGE_STYLE}</style>
<script src="{PLAYERJS_SRC}"></script>
</head>
<body>
<div id="error" class="{error_class}">{error_text}</div>
<div id="player" class="video_player" data-player-id="{player_id}" data-playlist-index="{index}">
  <h1 class="video_player__title">{title}</h1>
  <div class="video_player__video">{video}</div>
  <p class="video_player__description">{description}</p>
  <div class="video_player__controls">
    <button class="video_player__back" type="button">Back</button>
    <button class="video_player__skip" type="button">Skip</button>
  </div>
  <p class="video_player__position">{position} / {length}</p>
</div>
<script>{PAGE_SCRIPT}</script>
</body>
</html>
"#,
        page_title = if snapshot.title.is_empty() {
            "Playlist".to_string()
        } else {
            escape_html(&snapshot.title)
        },
        title = escape_html(&snapshot.title),
        description = escape_html(&snapshot.description),
        video = snapshot.video_markup,
        position = if snapshot.playlist_length == 0 {
            0
        } else {
            snapshot.playlist_index + 1
        },
        length = snapshot.playlist_length,
        index = snapshot.playlist_index,
    )
}
