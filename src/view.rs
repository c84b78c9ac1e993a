// src/view.rs
//! View dispatcher: picks the rendering variant from the category and turns
//! filtered records into a serializable view model.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt::Display;

use crate::categories::{Category, RenderVariant};
use crate::dates::format_date;
use crate::filter::WindowSelector;
use crate::retrieval::{CompanyProfile, OpportunityRecord};
use crate::session::SessionState;

pub const EMPTY_HEADING: &str = "No opportunities found";
const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub source: String,
    pub date_label: String,
    pub summary: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsSummary {
    pub count: usize,
    pub text: String,
    pub filter_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkItem {
    pub title: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCard {
    pub company_name: String,
    pub founded: Option<String>,
    pub product_range: Vec<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ViewBody {
    Loading { message: String },
    Empty { heading: String, message: String },
    Cards { summary: ResultsSummary, cards: Vec<Card> },
    LinkList { items: Vec<LinkItem> },
    Profile { card: ProfileCard },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub category: String,
    pub category_link: Option<String>,
    pub variant: RenderVariant,
    pub window: WindowSelector,
    pub window_label: &'static str,
    pub show_window_controls: bool,
    pub refresh_enabled: bool,
    pub body: ViewBody,
}

impl ViewModel {
    pub fn is_empty_state(&self) -> bool {
        matches!(self.body, ViewBody::Empty { .. })
    }
}

pub fn loading_message(category: &str) -> String {
    format!("Loading latest {category} opportunities...")
}

pub fn empty_message(category: &str, window: WindowSelector) -> String {
    format!("No opportunities found for {category} ({}).", window.label())
}

/// Render already-filtered `records` for `category`.
///
/// Empty input always yields the uniform empty state, whatever the variant.
pub fn render<Tz>(
    category: &Category,
    records: &[OpportunityRecord],
    window: WindowSelector,
    now: &DateTime<Tz>,
) -> ViewModel
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let body = if records.is_empty() {
        ViewBody::Empty {
            heading: EMPTY_HEADING.to_string(),
            message: empty_message(&category.name, window),
        }
    } else {
        match category.variant {
            RenderVariant::Default => render_cards(category, records, window, now),
            RenderVariant::LinkList => render_link_list(records),
            RenderVariant::Profile => render_profile(&records[0]),
        }
    };
    frame(category, window, true, body)
}

/// Render the whole session, including the in-flight loading state.
pub fn render_session<Tz>(session: &SessionState, now: &DateTime<Tz>) -> ViewModel
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let category = session.category();
    let window = session.effective_window();
    if session.is_loading() {
        let body = ViewBody::Loading {
            message: loading_message(&category.name),
        };
        return frame(category, window, false, body);
    }
    render(category, session.visible(), window, now)
}

fn frame(
    category: &Category,
    window: WindowSelector,
    refresh_enabled: bool,
    body: ViewBody,
) -> ViewModel {
    ViewModel {
        category: category.name.clone(),
        category_link: category.link.clone(),
        variant: category.variant,
        window,
        window_label: window.label(),
        show_window_controls: category.shows_window_controls(),
        refresh_enabled,
        body,
    }
}

fn render_cards<Tz>(
    category: &Category,
    records: &[OpportunityRecord],
    window: WindowSelector,
    now: &DateTime<Tz>,
) -> ViewBody
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let cards = records
        .iter()
        .enumerate()
        .map(|(index, r)| Card {
            id: r.display_id(index),
            title: title_or_placeholder(&r.title),
            source: r.source.clone().unwrap_or_default(),
            date_label: format_date(r.date.as_ref(), now),
            summary: r.summary.clone().unwrap_or_default(),
            link: r.link.clone(),
        })
        .collect::<Vec<_>>();

    let summary = ResultsSummary {
        count: cards.len(),
        text: format!("{} opportunities found for {}", cards.len(), category.name),
        filter_text: format!("Filter: {}", window.label()),
    };
    ViewBody::Cards { summary, cards }
}

fn render_link_list(records: &[OpportunityRecord]) -> ViewBody {
    let items = records
        .iter()
        .map(|r| LinkItem {
            title: title_or_placeholder(&r.title),
            link: r.link.clone(),
        })
        .collect();
    ViewBody::LinkList { items }
}

fn render_profile(record: &OpportunityRecord) -> ViewBody {
    // Providers that answered with a plain record still get a profile card.
    let profile = record.profile.clone().unwrap_or_else(|| CompanyProfile {
        company_name: record.title.clone(),
        website: record.link.clone(),
        ..CompanyProfile::default()
    });
    ViewBody::Profile {
        card: ProfileCard {
            company_name: title_or_placeholder(&profile.company_name),
            founded: profile.founded,
            product_range: profile.product_range,
            website: profile.website,
            address: profile.address,
        },
    }
}

fn title_or_placeholder(title: &str) -> String {
    if title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}
