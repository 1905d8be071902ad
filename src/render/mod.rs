use crate::api::{RecoPayload, Recommendation};
use crate::session::{budget_dollars, ViewState};

/// Dollar amount with cents, for totals coming back as floats.
pub fn format_usd(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Short device identifier shown in the form header.
pub fn short_device_id(device_id: &str) -> String {
    let prefix: String = device_id.chars().take(8).collect();
    format!("{prefix}…")
}

/// The preference form, or whatever blocks it (loading, fatal config error).
pub fn render_form(device_id: &str, state: &ViewState) -> String {
    let mut out = String::new();
    out.push_str(&format!("Device: {}\n", short_device_id(device_id)));

    if state.loading {
        out.push_str("Loading…\n");
        return out;
    }

    if let Some(err) = &state.error {
        out.push_str(&format!("Error: {err}\n"));
    }

    let prefs = &state.preferences;
    out.push_str(&format!("Cuisine:        {}\n", prefs.cuisine));
    out.push_str(&format!("Max ETA:        {} min\n", prefs.max_eta_minutes));
    out.push_str(&format!(
        "Budget max:     ${} (approx)\n",
        budget_dollars(prefs.budget_max_cents)
    ));

    if state.saving {
        out.push_str("Saving…\n");
    }
    out
}

/// The recommendation card: primary pick, reasons, items, alternatives.
pub fn render_recommendation(reco: &Recommendation) -> String {
    let mut out = String::new();
    let pick = &reco.recommended;

    out.push_str("Recommended\n");
    out.push_str(&format!("  {}\n", pick.restaurant));

    let mut summary = format!(
        "  {} min · {}",
        pick.eta_minutes,
        format_usd(pick.estimated_total_usd)
    );
    if let Some(deal) = &pick.deal {
        summary.push_str(&format!(" · {}", deal.label));
    }
    out.push_str(&summary);
    out.push('\n');

    if let Some(why) = &pick.why {
        out.push_str(&format!("  {why}\n"));
    }

    for item in &pick.items {
        out.push_str(&format!("  • {item}\n"));
    }

    // Deep link into the delivery app is a later step; keep the affordance
    // visible so the flow reads end to end.
    out.push_str("  [order placement not wired up yet]\n");

    if !reco.alternatives.is_empty() {
        out.push_str("Other options\n");
        for alt in &reco.alternatives {
            out.push_str(&format!("  {} — {}\n", alt.restaurant, alt.why_not));
        }
    }
    out
}

/// Minimal-variant payload: structured bodies get the full card, anything
/// else a labeled dump instead of silently passing untyped data through.
pub fn render_payload(payload: &RecoPayload) -> String {
    match payload {
        RecoPayload::Structured(reco) => render_recommendation(reco),
        RecoPayload::Unknown(value) => {
            let body = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            format!("Unrecognized response shape:\n{body}\n")
        }
    }
}
