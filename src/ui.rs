use crate::activities::ActivityRegistry;
use crate::calendar::date_key;
use crate::daylog::DayLog;
use crate::models::Completion;
use chrono::Local;

pub fn render_index(activities: &ActivityRegistry, log: &DayLog, completion: &Completion) -> String {
    let tiles: String = activities
        .iter()
        .map(|activity| {
            let done = log.is_done(&activity.id);
            let stamp = log
                .completed_at
                .get(&activity.id)
                .map(|at| format!("Done at {}", at.with_timezone(&Local).format("%-I:%M %p")))
                .unwrap_or_default();
            format!(
                r#"<form method="post" action="/toggle/{id}">
        <button class="tile{checked}" type="submit">
          <span class="check">&#10003;</span>
          <span class="label">{label}</span>
          <span class="stamp">{stamp}</span>
        </button>
      </form>"#,
                id = escape(activity.id.as_str()),
                checked = if done { " checked" } else { "" },
                label = escape(&activity.label),
                stamp = escape(&stamp),
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ");

    let banner = if completion.is_fully_complete && !activities.is_empty() {
        r#"<p class="banner">All done for today, great work!</p>"#
    } else {
        ""
    };

    INDEX_HTML
        .replace("{{DATE}}", &date_key(log.date))
        .replace("{{COUNT}}", &completion.count.to_string())
        .replace("{{TOTAL}}", &activities.len().to_string())
        .replace("{{PERCENT}}", &completion.percent.to_string())
        .replace("{{BANNER}}", banner)
        .replace("{{TILES}}", &tiles)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Today</title>
  <style>
    :root {
      --bg: #f7f7f5;
      --ink: #1f2328;
      --muted: #6b7280;
      --accent: #22c55e;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(31, 35, 40, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    .progress {
      height: 8px;
      border-radius: 999px;
      background: #e5e7eb;
      overflow: hidden;
    }

    .progress span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .tiles {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .tile {
      width: 100%;
      border: 2px solid #e5e7eb;
      border-radius: 18px;
      background: var(--card);
      padding: 36px 12px;
      display: grid;
      gap: 8px;
      cursor: pointer;
      font: inherit;
    }

    .tile .check {
      opacity: 0;
      color: var(--accent);
    }

    .tile.checked {
      border-color: transparent;
      background: #f0fdf4;
      box-shadow: 0 0 0 2px var(--accent);
    }

    .tile.checked .check {
      opacity: 1;
    }

    .stamp,
    .muted {
      color: var(--muted);
      font-size: 0.8rem;
      min-height: 1em;
    }

    .banner {
      color: #059669;
      font-weight: 600;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Today</h1>
      <p class="muted">{{DATE}} &middot; tap each activity once you've completed it</p>
    </header>
    <section>
      <p><strong>{{COUNT}} / {{TOTAL}}</strong> done today &middot; {{PERCENT}}%</p>
      <div class="progress"><span style="width: {{PERCENT}}%"></span></div>
      {{BANNER}}
    </section>
    <section class="tiles">
      {{TILES}}
    </section>
    <p class="muted">Progress is saved automatically and resets each day at midnight.</p>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daylog::toggle;
    use crate::stats::compute_completion;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn index_marks_done_tiles_and_progress() {
        let registry = ActivityRegistry::default();
        let empty = DayLog::empty(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let log = toggle(&"guitar".into(), &empty, Utc::now());
        let html = render_index(&registry, &log, &compute_completion(&log, registry.len()));

        assert!(html.contains("2026-03-01"));
        assert!(html.contains("1 / 4"));
        assert!(html.contains("width: 25%"));
        assert!(html.contains(r#"action="/toggle/guitar""#));
        assert_eq!(html.matches("tile checked").count(), 1);
        assert!(html.contains("Done at"));
        assert!(!html.contains("great work"));
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(escape(r#"<b>"R&B""#), "&lt;b&gt;&quot;R&amp;B&quot;");
    }
}
