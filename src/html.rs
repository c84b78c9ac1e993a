// src/html.rs
//! Server-rendered dashboard page. Forms post events back to the router.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write as _;

use crate::categories::Category;
use crate::filter::WindowSelector;
use crate::view::{Card, LinkItem, ProfileCard, ResultsSummary, ViewBody, ViewModel};

const TITLE: &str = "AI Market Scout Dashboard";
const TAGLINE: &str = "Stay ahead with real-time environmental & market intelligence";

fn window_icon(w: WindowSelector) -> &'static str {
    match w {
        WindowSelector::All => "🌎",
        WindowSelector::Day => "📅",
        WindowSelector::Month => "🗓️",
        WindowSelector::Year => "📆",
    }
}

fn control_label(w: WindowSelector) -> &'static str {
    // Controls say "All"; the empty state says "All Time".
    match w {
        WindowSelector::All => "All",
        other => other.label(),
    }
}

/// Full page for `vm`, with `categories` in selector order.
pub fn render_page(vm: &ViewModel, categories: &[Category]) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", text(TITLE));
    out.push_str("<link rel=\"stylesheet\" href=\"/static/dashboard.css\">\n</head>\n<body>\n");
    out.push_str("<div class=\"app-container\">\n<header class=\"header\">\n");
    let _ = writeln!(out, "<h1>{}</h1>\n<p>{}</p>", text(TITLE), text(TAGLINE));

    push_selector(&mut out, vm, categories);
    if vm.show_window_controls {
        push_window_controls(&mut out, vm.window);
    }
    push_refresh(&mut out, vm.refresh_enabled);

    out.push_str("</header>\n<main class=\"main-content\">\n");
    push_body(&mut out, vm);
    out.push_str("</main>\n</div>\n</body>\n</html>\n");
    out
}

fn push_selector(out: &mut String, vm: &ViewModel, categories: &[Category]) {
    out.push_str("<form class=\"product-filter\" method=\"post\" action=\"/select\">\n");
    out.push_str("<label for=\"product\" class=\"dropdown-label\">Select Product:</label>\n");
    out.push_str("<select id=\"product\" name=\"category\" class=\"dropdown\" onchange=\"this.form.submit()\">\n");
    for c in categories {
        let selected = if c.name == vm.category { " selected" } else { "" };
        let _ = writeln!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            attr(&c.name),
            selected,
            text(&c.name)
        );
    }
    out.push_str("</select>\n<noscript><button type=\"submit\">Go</button></noscript>\n");
    if let Some(link) = &vm.category_link {
        let _ = writeln!(
            out,
            "<a href=\"{}\" target=\"_blank\" rel=\"noreferrer\" class=\"category-link\">🔗 {}</a>",
            attr(link),
            text(link)
        );
    }
    out.push_str("</form>\n");
}

fn push_window_controls(out: &mut String, active: WindowSelector) {
    out.push_str("<form class=\"filter-buttons\" method=\"post\" action=\"/window\">\n");
    for w in WindowSelector::ALL {
        let class = if w == active { " class=\"active\"" } else { "" };
        let _ = writeln!(
            out,
            "<button type=\"submit\" name=\"window\" value=\"{}\"{}>{} {}</button>",
            w.as_str(),
            class,
            window_icon(w),
            text(control_label(w))
        );
    }
    out.push_str("</form>\n");
}

fn push_refresh(out: &mut String, enabled: bool) {
    let (disabled, label) = if enabled {
        ("", "Refresh")
    } else {
        (" disabled", "Refreshing...")
    };
    let _ = writeln!(
        out,
        "<form method=\"post\" action=\"/refresh\"><button type=\"submit\" class=\"refresh-btn\"{disabled}>🔄 {label}</button></form>"
    );
}

fn push_body(out: &mut String, vm: &ViewModel) {
    match &vm.body {
        ViewBody::Loading { message } => {
            let _ = writeln!(
                out,
                "<div class=\"loading\"><div>⏳ {}</div></div>",
                text(message)
            );
        }
        ViewBody::Empty { heading, message } => {
            let _ = writeln!(
                out,
                "<div class=\"empty\"><div><h3>{}</h3><p>{}</p><p>Try adjusting your search criteria or check back later.</p></div></div>",
                text(heading),
                text(message)
            );
        }
        ViewBody::Cards { summary, cards } => {
            push_summary(out, summary);
            out.push_str("<div class=\"card-grid\">\n");
            for card in cards {
                push_card(out, card);
            }
            out.push_str("</div>\n");
        }
        ViewBody::LinkList { items } => push_link_list(out, items),
        ViewBody::Profile { card } => push_profile(out, card),
    }
}

fn push_summary(out: &mut String, s: &ResultsSummary) {
    let _ = writeln!(
        out,
        "<div class=\"results-summary\"><div>{}</div><div class=\"results-filter\"><span class=\"pulse\"></span>{}</div></div>",
        text(&s.text),
        text(&s.filter_text)
    );
}

fn push_card(out: &mut String, card: &Card) {
    let _ = writeln!(
        out,
        "<div class=\"card\" id=\"opp-{}\">\n<h2>{}</h2>\n<div class=\"meta\"><strong>Source:</strong> {}<br><strong>Date:</strong> {}</div>\n<p class=\"summary\">{}</p>",
        attr(&card.id),
        text(&card.title),
        text(&card.source),
        text(&card.date_label),
        text(&card.summary)
    );
    if let Some(link) = &card.link {
        let _ = writeln!(
            out,
            "<a href=\"{}\" target=\"_blank\" rel=\"noreferrer\" class=\"read-more\">🔗 Read Full Article</a>",
            attr(link)
        );
    }
    out.push_str("</div>\n");
}

fn push_link_list(out: &mut String, items: &[LinkItem]) {
    out.push_str("<ol class=\"link-list\">\n");
    for item in items {
        match &item.link {
            Some(link) => {
                let _ = writeln!(
                    out,
                    "<li><a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a></li>",
                    attr(link),
                    text(&item.title)
                );
            }
            None => {
                let _ = writeln!(out, "<li>{}</li>", text(&item.title));
            }
        }
    }
    out.push_str("</ol>\n");
}

fn push_profile(out: &mut String, card: &ProfileCard) {
    let _ = writeln!(
        out,
        "<section class=\"profile-card\">\n<h2>{}</h2>\n<dl>",
        text(&card.company_name)
    );
    if let Some(founded) = &card.founded {
        let _ = writeln!(out, "<dt>Founded</dt><dd>{}</dd>", text(founded));
    }
    if !card.product_range.is_empty() {
        out.push_str("<dt>Product Range</dt><dd><ul>");
        for p in &card.product_range {
            let _ = write!(out, "<li>{}</li>", text(p));
        }
        out.push_str("</ul></dd>\n");
    }
    if let Some(website) = &card.website {
        let _ = writeln!(
            out,
            "<dt>Website</dt><dd><a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a></dd>",
            attr(website),
            text(website)
        );
    }
    if let Some(address) = &card.address {
        let _ = writeln!(out, "<dt>Address</dt><dd>{}</dd>", text(address));
    }
    out.push_str("</dl>\n</section>\n");
}
