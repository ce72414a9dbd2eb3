//! HTML rendering for the three screens

use crate::animation::ANIMATION_FALLBACK;
use crate::types::history::HistoryRecord;
use crate::types::prediction::Verdict;
use crate::types::transaction::{DayOfWeek, TransactionForm};
use crate::web::{PageContext, View};
use serde_json::Value;
use std::fmt::Write;

const STYLE: &str = r#"
body { margin: 0; font-family: "Segoe UI", Helvetica, Arial, sans-serif; color: white;
       background: linear-gradient(to right, #000000, #0f2027, #203a43, #2c5364); min-height: 100vh; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 260px; background: #000000; padding: 24px; box-sizing: border-box; }
.sidebar hr, .main hr { border: none; border-top: 1px solid rgba(255,255,255,0.15); margin: 18px 0; }
.sidebar label { display: block; margin: 8px 0; cursor: pointer; }
.caption { font-size: 0.85em; opacity: 0.75; }
.main { flex: 1; padding: 32px 48px; }
h1, h2, h3 { color: white; text-shadow: 2px 2px 5px black; }
.row { display: flex; gap: 32px; align-items: flex-start; }
.grow2 { flex: 2; } .grow1 { flex: 1; }
.glass-card { padding: 30px; border-radius: 18px; background: rgba(255,255,255,0.05);
              border: 1px solid rgba(255,255,255,0.15); box-shadow: 0 8px 32px rgba(0,0,0,0.2);
              backdrop-filter: blur(10px); }
.fields { display: grid; grid-template-columns: 1fr 1fr; gap: 18px 32px; }
.fields label { display: block; margin-bottom: 6px; }
input, select { width: 100%; box-sizing: border-box; padding: 10px; background-color: rgba(255,255,255,0.12);
                color: white; border-radius: 8px; border: 1px solid rgba(255,255,255,0.25); }
select option { color: black; }
button { background: linear-gradient(45deg, #FF512F, #DD2476); color: white; padding: 12px 24px;
         border-radius: 40px; border: none; width: 100%; font-weight: bold; letter-spacing: 1px;
         transition: 0.3s ease; margin-top: 24px; cursor: pointer; }
button:hover { transform: scale(1.03); box-shadow: 0 0 20px rgba(255,105,180,0.6); }
.alert { padding: 14px 18px; border-radius: 8px; margin: 12px 0; }
.alert-error { background: rgba(255, 43, 43, 0.25); border: 1px solid rgba(255, 43, 43, 0.6); }
.alert-success { background: rgba(33, 195, 84, 0.25); border: 1px solid rgba(33, 195, 84, 0.6); }
.alert-info { background: rgba(28, 131, 225, 0.25); border: 1px solid rgba(28, 131, 225, 0.6); }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 8px 12px; border-bottom: 1px solid rgba(255,255,255,0.15); text-align: left; }
.fallback { opacity: 0.8; }
"#;

const LOTTIE_SCRIPT: &str = r#"
<script src="https://cdnjs.cloudflare.com/ajax/libs/lottie-web/5.12.2/lottie.min.js"></script>
<script>
document.querySelectorAll(".lottie").forEach(function (el) {
  if (window.lottie) {
    lottie.loadAnimation({ container: el, renderer: "svg", loop: true, autoplay: true,
                           animationData: JSON.parse(el.dataset.animation) });
  }
});
</script>
"#;

/// Escape text for HTML bodies and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Animation container, or the text placeholder when it failed to load
fn lottie(animation: Option<&Value>, height: u32, key: &str) -> String {
    match animation {
        Some(animation) => format!(
            r#"<div class="lottie" id="lottie-{key}" style="height:{height}px" data-animation="{}"></div>"#,
            escape(&animation.to_string())
        ),
        None => format!(r#"<p class="fallback">{ANIMATION_FALLBACK}</p>"#),
    }
}

fn sidebar(ctx: &PageContext<'_>) -> String {
    let mut nav = String::new();
    for view in View::ALL {
        let checked = if view == ctx.view { " checked" } else { "" };
        let _ = write!(
            nav,
            r#"<label><input type="radio" name="view" value="{}"{checked} onchange="this.form.submit()"> {}</label>"#,
            view.slug(),
            view.title()
        );
    }

    format!(
        r#"<aside class="sidebar">
{logo}
<h2>FraudShield AI</h2>
<h3>Secure Transaction Monitor</h3>
<hr>
<form method="get" action="/"><strong>Navigation</strong>{nav}<noscript><button type="submit">Go</button></noscript></form>
<hr>
<p class="caption">Model Status: ✅ ACTIVE ({model})</p>
<p class="caption">Transactions analyzed: {analyzed}</p>
</aside>"#,
        logo = lottie(ctx.animations.logo.as_ref(), 140, "logo"),
        model = escape(ctx.model_name),
        analyzed = ctx.predictions,
    )
}

fn page(ctx: &PageContext<'_>, main: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>FraudShield AI</title>
<link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>🛡️</text></svg>">
<style>{STYLE}</style>
</head>
<body>
<div class="layout">
{sidebar}
<main class="main">
{main}
</main>
</div>
{LOTTIE_SCRIPT}
</body>
</html>"#,
        sidebar = sidebar(ctx),
    )
}

/// What the dashboard shows below the form
pub enum DashboardOutcome<'a> {
    Empty,
    Verdict(&'a Verdict),
    Error(&'a str),
}

fn number_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "0.0".to_string())
}

/// Dashboard: form, and the prediction report after a submission
pub fn dashboard(
    ctx: &PageContext<'_>,
    form: Option<&TransactionForm>,
    outcome: DashboardOutcome<'_>,
) -> String {
    let selected_day = form.map(|f| f.day.as_str()).unwrap_or(DayOfWeek::Monday.name());
    let mut day_options = String::new();
    for day in DayOfWeek::ALL {
        let selected = if day.name() == selected_day { " selected" } else { "" };
        let _ = write!(day_options, r#"<option value="{0}"{selected}>{0}</option>"#, day.name());
    }

    let mut main = format!(
        r#"<div class="row">
<div class="grow2">
<h1>Fraud Transaction Detection</h1>
<p>Enter the transaction details below to predict if it's fraudulent.</p>
</div>
<div class="grow1">{header}</div>
</div>
<hr>
<form class="glass-card" method="post" action="/analyze">
<div class="fields">
<div><label for="amount">Transaction Amount</label>
<input id="amount" name="amount" type="number" min="0" step="any" value="{amount}" required></div>
<div><label for="day">Day of Week</label>
<select id="day" name="day">{day_options}</select></div>
<div><label for="hour">Transaction Hour (0–23)</label>
<input id="hour" name="hour" type="number" min="0" max="23" step="1" value="{hour}" required></div>
<div><label for="days_since_last">Days Since Last Transaction</label>
<input id="days_since_last" name="days_since_last" type="number" min="0" step="any" value="{days}" required></div>
</div>
<button type="submit">🔍 Analyze Risk</button>
</form>"#,
        header = lottie(ctx.animations.header.as_ref(), 180, "header"),
        amount = number_value(form.map(|f| f.amount)),
        hour = form.map(|f| f.hour).unwrap_or(0),
        days = number_value(form.map(|f| f.days_since_last)),
    );

    match outcome {
        DashboardOutcome::Empty => {}
        DashboardOutcome::Error(message) => {
            let _ = write!(
                main,
                r#"<hr><div class="alert alert-error">❌ {}</div>"#,
                escape(message)
            );
        }
        DashboardOutcome::Verdict(verdict) => {
            let (animation, key, class, marker) = if verdict.is_fraud() {
                (ctx.animations.alert.as_ref(), "alert", "alert-error", "🔴")
            } else {
                (ctx.animations.safe.as_ref(), "safe", "alert-success", "🟢")
            };
            let (lead, tail) = verdict.headline_parts();
            let _ = write!(
                main,
                r#"<hr>
<div class="row">
<div class="grow1">{animation}</div>
<div class="grow2">
<h3>📊 Prediction Report</h3>
<div class="alert {class}" data-label="{label}">{lead}<strong>{probability}</strong>{tail}</div>
<p>{marker} <strong>Recommendation:</strong> {recommendation}</p>
</div>
</div>"#,
                animation = lottie(animation, 220, key),
                label = verdict.label,
                lead = escape(lead),
                probability = escape(&verdict.display_probability),
                tail = escape(tail),
                recommendation = verdict.recommendation,
            );
        }
    }

    page(ctx, &main)
}

/// History: table of this session's predictions with a clear action
pub fn history(ctx: &PageContext<'_>, records: &[HistoryRecord], notice: Option<&str>) -> String {
    let mut main = String::from(
        "<h1>📚 Prediction History</h1>\n<p>All previously analyzed transactions are stored here.</p>\n",
    );

    if let Some(notice) = notice {
        let _ = write!(main, r#"<div class="alert alert-success">{}</div>"#, escape(notice));
    }

    if records.is_empty() {
        main.push_str(r#"<div class="alert alert-info">No history available yet.</div>"#);
    } else {
        main.push_str(
            "<table>\n<thead><tr><th></th><th>Amount</th><th>Hour</th><th>Day</th>\
             <th>Days Since Last</th><th>Prediction</th><th>Fraud Probability</th></tr></thead>\n<tbody>\n",
        );
        for (i, r) in records.iter().enumerate() {
            let _ = writeln!(
                main,
                "<tr><td>{i}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                r.amount, r.hour, r.day, r.days_since_last, r.prediction, r.fraud_probability
            );
        }
        main.push_str("</tbody>\n</table>\n");
        main.push_str(
            r#"<form method="post" action="/history/clear"><button type="submit">🗑️ Clear History</button></form>"#,
        );
    }

    page(ctx, &main)
}

/// About: static description of the system
pub fn about(ctx: &PageContext<'_>) -> String {
    let main = format!(
        r#"<h1>ℹ️ About FraudShield AI</h1>
<p>FraudShield AI is a real-time intelligent fraud detection system.<br>
It analyzes transaction patterns instantly and predicts whether a transaction is <strong>fraudulent or legitimate</strong>.</p>
<h3>🔥 Key Features</h3>
<ul>
<li>Machine-learning powered fraud prediction</li>
<li>Real-time fraud scoring</li>
<li>Web interface with a JSON API</li>
<li>Ability to <strong>view and track the history of previous predictions</strong></li>
</ul>
<h3>🧠 Technical Overview</h3>
<ul>
<li>Pre-trained classifier served through ONNX Runtime (model: <strong>{model}</strong>)</li>
<li>Features: amount, hour, day of week, days since last transaction</li>
<li>Predicts whether a transaction is <strong>Fraud</strong> or <strong>Not Fraud</strong></li>
</ul>"#,
        model = escape(ctx.model_name),
    );

    page(ctx, &main)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationAssets;
    use crate::types::{Label, PredictionResult};
    use serde_json::json;

    fn ctx<'a>(assets: &'a AnimationAssets, view: View) -> PageContext<'a> {
        PageContext {
            view,
            animations: assets,
            model_name: "model",
            predictions: 0,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_missing_animation_renders_fallback() {
        let assets = AnimationAssets::default();
        let html = dashboard(&ctx(&assets, View::Dashboard), None, DashboardOutcome::Empty);

        assert!(html.contains("Animation not available."));
        assert!(html.contains("Fraud Transaction Detection"));
        assert!(html.contains(r#"action="/analyze""#));
    }

    #[test]
    fn test_loaded_animation_embedded() {
        let assets = AnimationAssets {
            header: Some(json!({"v": "5.7.4"})),
            ..Default::default()
        };
        let html = dashboard(&ctx(&assets, View::Dashboard), None, DashboardOutcome::Empty);

        assert!(html.contains(r#"id="lottie-header""#));
        assert!(html.contains("{&quot;v&quot;:&quot;5.7.4&quot;}"));
    }

    #[test]
    fn test_verdict_styling() {
        let assets = AnimationAssets::default();
        let fraud = Verdict::from_result(&PredictionResult {
            label: Label::Fraud,
            fraud_probability: 0.91,
        });
        let html = dashboard(&ctx(&assets, View::Dashboard), None, DashboardOutcome::Verdict(&fraud));
        assert!(html.contains("alert-error"));
        assert!(html.contains("Fraud Detected! Probability: <strong>0.91</strong>"));
        assert!(html.contains("Freeze transaction and start manual review."));

        let legit = Verdict::from_result(&PredictionResult {
            label: Label::Legit,
            fraud_probability: 0.02,
        });
        let html = dashboard(&ctx(&assets, View::Dashboard), None, DashboardOutcome::Verdict(&legit));
        assert!(html.contains("alert-success"));
        assert!(html.contains("(Fraud Chance: <strong>0.02</strong>)"));
        assert!(html.contains("Transaction safe to approve."));
    }

    #[test]
    fn test_sticky_form_values() {
        let assets = AnimationAssets::default();
        let form = TransactionForm {
            amount: 250.0,
            hour: 2,
            day: "Sunday".to_string(),
            days_since_last: 0.5,
        };
        let html = dashboard(&ctx(&assets, View::Dashboard), Some(&form), DashboardOutcome::Empty);
        assert!(html.contains(r#"value="250""#));
        assert!(html.contains(r#"<option value="Sunday" selected>"#));
    }

    #[test]
    fn test_decimal_inputs_accept_any_precision() {
        let assets = AnimationAssets::default();
        let html = dashboard(&ctx(&assets, View::Dashboard), None, DashboardOutcome::Empty);

        let amount = input_tag(&html, "amount");
        assert!(amount.contains(r#"step="any""#));
        assert!(!amount.contains(r#"step="0.1""#));

        let days = input_tag(&html, "days_since_last");
        assert!(days.contains(r#"step="any""#));

        // hour stays whole
        assert!(input_tag(&html, "hour").contains(r#"step="1""#));
    }

    fn input_tag<'a>(html: &'a str, id: &str) -> &'a str {
        let start = html
            .find(&format!(r#"<input id="{id}""#))
            .unwrap();
        let end = start + html[start..].find('>').unwrap();
        &html[start..=end]
    }

    #[test]
    fn test_empty_history() {
        let assets = AnimationAssets::default();
        let html = history(&ctx(&assets, View::History), &[], None);
        assert!(html.contains("No history available yet."));
        assert!(!html.contains("Clear History"));
    }

    #[test]
    fn test_history_table() {
        let assets = AnimationAssets::default();
        let records = vec![HistoryRecord {
            amount: 250.0,
            hour: 2,
            day: DayOfWeek::Sunday,
            days_since_last: 0.0,
            prediction: Label::Fraud,
            fraud_probability: 0.91,
        }];
        let html = history(&ctx(&assets, View::History), &records, None);
        assert!(html.contains("<td>Sunday</td>"));
        assert!(html.contains("<td>FRAUD</td>"));
        assert!(html.contains("<td>0.91</td>"));
        assert!(html.contains("Clear History"));
    }

    #[test]
    fn test_nav_marks_current_view() {
        let assets = AnimationAssets::default();
        let html = about(&ctx(&assets, View::About));
        assert!(html.contains(r#"value="about" checked"#));
        assert!(!html.contains(r#"value="dashboard" checked"#));
    }
}
