//! HTML rendering of the marketing page.
//!
//! Every top-level region of the page has its own renderer so that
//! [`LiveView`](crate::view::LiveView) can re-render only what a state change
//! touched. [`render_page`] stitches the regions into a full document and
//! [`generate`] writes it to disk alongside a JSON snapshot of the state it was
//! rendered from.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html      # Full page, CSS inlined
//! └── state.json      # PageState + reveal board the page was rendered from
//! ```
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time; color custom properties are
//! generated from `config.toml` and prepended.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Content strings are escaped automatically, so a review body can never
//! inject markup.

use crate::config::{self, PageConfig};
use crate::content::Content;
use crate::particles::Particle;
use crate::state::{PageState, RevealBoard};
use crate::types::{FormField, NAV_LINKS, Section};
use crate::view::Region;
use maud::{DOCTYPE, Markup, html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a renderer reads: immutable content plus a state snapshot.
pub struct RenderContext<'a> {
    pub content: &'a Content,
    pub config: &'a PageConfig,
    pub state: PageState,
    pub reveals: RevealBoard,
    pub particles: &'a [Particle],
}

#[derive(Serialize)]
struct StateSnapshot<'a> {
    state: &'a PageState,
    reveals: &'a RevealBoard,
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Full stylesheet: color variables followed by the static rules.
pub fn page_css(config: &PageConfig) -> String {
    let color_css = config::generate_color_css(&config.colors);
    format!("{}\n\n{}", color_css, CSS_STATIC)
}

/// Write `index.html` and `state.json` into `output_dir`.
pub fn generate(output_dir: &Path, ctx: &RenderContext<'_>) -> Result<PathBuf, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let index_path = output_dir.join("index.html");
    fs::write(&index_path, render_page(ctx).into_string())?;
    tracing::info!(path = %index_path.display(), "generated page");

    let snapshot = StateSnapshot {
        state: &ctx.state,
        reveals: &ctx.reveals,
    };
    let state_path = output_dir.join("state.json");
    fs::write(&state_path, serde_json::to_string_pretty(&snapshot)?)?;
    tracing::debug!(path = %state_path.display(), "wrote state snapshot");

    Ok(index_path)
}

// ============================================================================
// Document
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (css) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the complete page from the current state.
pub fn render_page(ctx: &RenderContext<'_>) -> Markup {
    let title = format!("{} {}", ctx.content.name, title_case(&ctx.content.tagline));
    let content = html! {
        @for region in Region::ALL {
            (render_region(region, ctx))
        }
        (render_footer(ctx))
    };
    base_document(&title, &page_css(ctx.config), content)
}

/// Renders one live region.
pub fn render_region(region: Region, ctx: &RenderContext<'_>) -> Markup {
    match region {
        Region::Nav => render_nav(ctx),
        Region::Section(Section::Hero) => render_hero(ctx),
        Region::Section(Section::Experience) => render_experience(ctx),
        Region::Section(Section::Menu) => render_menu(ctx),
        Region::Section(Section::Wine) => render_wine(ctx),
        Region::Section(Section::Reviews) => render_reviews(ctx),
        Region::Section(Section::Gallery) => render_gallery(ctx),
        Region::Section(Section::Contact) => render_contact(ctx),
    }
}

/// `"DINE & WINE"` -> `"Dine & Wine"`
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn section_class(ctx: &RenderContext<'_>, section: Section, base: &str) -> String {
    if ctx.reveals.is_revealed(section) {
        format!("{base} reveal revealed")
    } else {
        format!("{base} reveal")
    }
}

fn stars(rating: u8) -> String {
    "★".repeat(rating as usize)
}

// ============================================================================
// Regions
// ============================================================================

/// Fixed navigation bar with the mobile panel.
pub fn render_nav(ctx: &RenderContext<'_>) -> Markup {
    let open = ctx.state.is_nav_menu_open;
    let bar_class = if ctx.state.is_scrolled {
        "site-nav scrolled"
    } else {
        "site-nav"
    };
    html! {
        nav #site-nav class=(bar_class) {
            a.brand href="#home" {
                span.brand-name { (ctx.content.name) }
                span.brand-tagline { (ctx.content.tagline) }
            }
            ul.nav-links {
                @for (label, section) in NAV_LINKS {
                    li { a href={ "#" (section.anchor()) } data-section=(section.anchor()) { (label) } }
                }
            }
            button.nav-hamburger type="button" aria-label="Toggle menu"
                aria-expanded=(if open { "true" } else { "false" }) {
                @if open { "×" } @else { "☰" }
            }
            @if open {
                div.nav-panel.open {
                    ul {
                        @for (label, section) in NAV_LINKS {
                            li { a href={ "#" (section.anchor()) } data-section=(section.anchor()) { (label) } }
                        }
                    }
                }
            }
        }
    }
}

pub fn render_hero(ctx: &RenderContext<'_>) -> Markup {
    let content = ctx.content;
    let hero_style = format!("background-image: url('{}');", content.hero_image);
    html! {
        section #home class=(section_class(ctx, Section::Hero, "hero"))
            data-hero-plays=(ctx.reveals.hero_plays()) style=(hero_style) {
            div.hero-overlay {}
            div.particles aria-hidden="true" {
                @for particle in ctx.particles {
                    span.particle style=(particle.style()) {}
                }
            }
            div.hero-content {
                p.hero-rating {
                    span.stars { (stars(5)) }
                    " " (content.rating) " · " (content.review_total) " reviews"
                }
                h1 { (content.name) }
                p.hero-tagline { (content.tagline) }
                p.hero-intro { (content.intro) }
                ul.services {
                    @for service in &content.services {
                        li { (service) }
                    }
                }
                div.hero-actions {
                    a.button.primary href="#contact" { "Reserve a Table" }
                    a.button href="#menu" { "View Menu" }
                }
            }
        }
    }
}

pub fn render_experience(ctx: &RenderContext<'_>) -> Markup {
    let exp = &ctx.content.experience;
    html! {
        section #experience class=(section_class(ctx, Section::Experience, "experience")) {
            div.experience-image {
                img src=(exp.image) alt=(exp.heading) loading="lazy";
            }
            div.experience-text {
                h2 { (exp.heading) }
                p { (exp.body) }
                ul.features {
                    @for feature in &exp.features {
                        li {
                            h3 { (feature.title) }
                            p { (feature.description) }
                        }
                    }
                }
                p.closing { (exp.closing) }
            }
        }
    }
}

/// Category tabs and the items of the active category only.
pub fn render_menu(ctx: &RenderContext<'_>) -> Markup {
    let active = ctx.state.active_menu_category_index;
    let items = ctx.content.menu_items(active).unwrap_or_default();
    html! {
        section #menu class=(section_class(ctx, Section::Menu, "menu")) {
            h2 { "Our Menu" }
            div.menu-tabs role="tablist" {
                @for (index, category) in ctx.content.menu.iter().enumerate() {
                    @let is_active = index == active;
                    button.menu-tab.active[is_active] type="button" role="tab"
                        data-index=(index) aria-selected=(if is_active { "true" } else { "false" }) {
                        (category.title)
                    }
                }
            }
            div.menu-grid data-category=(active) {
                @for item in items {
                    article.menu-item {
                        img src=(item.image) alt=(item.name) loading="lazy";
                        div.menu-item-body {
                            h3 { (item.name) }
                            p { (item.description) }
                            span.price { (item.price) }
                        }
                    }
                }
            }
        }
    }
}

pub fn render_wine(ctx: &RenderContext<'_>) -> Markup {
    html! {
        section #wine class=(section_class(ctx, Section::Wine, "wine")) {
            h2 { "The Wine Collection" }
            div.wine-grid {
                @for wine in &ctx.content.wines {
                    div.wine-card {
                        h3 { (wine.title) }
                        p { (wine.description) }
                    }
                }
            }
        }
    }
}

/// The featured review plus one dot per review.
pub fn render_reviews(ctx: &RenderContext<'_>) -> Markup {
    let active = ctx.state.active_review_index;
    html! {
        section #reviews class=(section_class(ctx, Section::Reviews, "reviews")) {
            h2 { "What Our Guests Say" }
            @if let Some(review) = ctx.content.reviews.get(active) {
                blockquote.review-card data-review=(review.id) {
                    div.review-header {
                        span.avatar { (review.initial()) }
                        div {
                            cite { (review.name) }
                            span.review-time { (review.time) }
                        }
                        span.stars aria-label={ (review.rating) " out of 5" } { (stars(review.rating)) }
                    }
                    p { (review.body) }
                    @if !review.tags.is_empty() {
                        ul.review-tags {
                            @for tag in &review.tags {
                                li { (tag) }
                            }
                        }
                    }
                }
            }
            div.review-dots {
                @for (index, review) in ctx.content.reviews.iter().enumerate() {
                    button.dot.active[index == active] type="button" data-index=(index)
                        aria-label={ "Show review by " (review.name) } {}
                }
            }
        }
    }
}

pub fn render_gallery(ctx: &RenderContext<'_>) -> Markup {
    html! {
        section #gallery class=(section_class(ctx, Section::Gallery, "gallery")) {
            h2 { "Gallery" }
            div.gallery-grid {
                @for item in &ctx.content.gallery {
                    figure.gallery-item {
                        img src=(item.image) alt=(item.title) loading="lazy";
                        figcaption {
                            span.gallery-category { (item.category) }
                            span.gallery-title { (item.title) }
                        }
                    }
                }
            }
        }
    }
}

/// Location details and the reservation form, inputs bound to state.
pub fn render_contact(ctx: &RenderContext<'_>) -> Markup {
    let contact = &ctx.content.contact;
    let r = &ctx.state.reservation;
    html! {
        section #contact class=(section_class(ctx, Section::Contact, "contact")) {
            div.contact-info {
                h2 { "Visit Us" }
                address {
                    (contact.address) br;
                    small { (contact.plus_code) }
                }
                p.hours { (contact.hours) }
                p { a href={ "tel:" (contact.phone.replace(' ', "")) } { (contact.phone) } }
                p { a href={ "mailto:" (contact.email) } { (contact.email) } }
                iframe.map src=(contact.map_embed_url) title="Map" loading="lazy" {}
            }
            form.reservation-form #reservation {
                h3 { "Make a Reservation" }
                (text_input(FormField::Name, "text", "Your Name", r.get(FormField::Name)))
                (text_input(FormField::Phone, "tel", "Phone Number", r.get(FormField::Phone)))
                (text_input(FormField::Date, "datetime-local", "", r.get(FormField::Date)))
                textarea name=(FormField::Message.name()) rows="4"
                    placeholder="Special requests" { (r.get(FormField::Message)) }
                button.button.primary type="submit" { "Request Reservation" }
            }
        }
    }
}

fn text_input(field: FormField, kind: &str, placeholder: &str, value: &str) -> Markup {
    html! {
        input type=(kind) name=(field.name()) value=(value)
            placeholder=[(!placeholder.is_empty()).then_some(placeholder)]
            required[field.is_required()];
    }
}

fn render_footer(ctx: &RenderContext<'_>) -> Markup {
    let content = ctx.content;
    html! {
        footer.site-footer {
            div.footer-brand {
                span.brand-name { (content.name) }
                span.brand-tagline { (content.tagline) }
            }
            ul.socials {
                @for social in &content.contact.socials {
                    li { (social) }
                }
            }
            p { (content.contact.website) }
            p.copyright { "© " (content.name) " " (title_case(&content.tagline)) }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::UserEvent;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn region_html(page: &crate::page::Page, region: Region) -> String {
        render_region(region, &page.render_context()).into_string()
    }

    #[test]
    fn nav_renders_links_and_scrolled_class() {
        let page = stock_page();
        let html = region_html(&page, Region::Nav);
        assert!(html.contains("href=\"#home\""));
        assert!(html.contains("href=\"#contact\""));
        assert!(!html.contains("scrolled"));
        assert!(!html.contains("nav-panel"));

        let sim = SimEnv::new();
        let _mounted = page.mount(&sim.environment());
        sim.viewport.scroll_to(51.0);
        assert!(region_html(&page, Region::Nav).contains("site-nav scrolled"));
    }

    #[test]
    fn open_nav_renders_panel() {
        let page = stock_page();
        let sim = SimEnv::new();
        let mounted = page.mount(&sim.environment());
        mounted.dispatch(UserEvent::ToggleNav).unwrap();
        let html = region_html(&page, Region::Nav);
        assert!(html.contains("nav-panel open"));
        assert!(html.contains("aria-expanded=\"true\""));
    }

    #[test]
    fn menu_shows_only_active_category() {
        let page = stock_page();
        let sim = SimEnv::new();
        let mounted = page.mount(&sim.environment());
        mounted.dispatch(UserEvent::SelectCategory(3)).unwrap();
        let html = region_html(&page, Region::Section(Section::Menu));
        assert!(html.contains("Chocolate Sphere"));
        assert!(!html.contains("Truffle Burrata"));
        assert!(html.contains("menu-tab active"));
        assert_eq!(html.matches("class=\"menu-item\"").count(), 4);
    }

    #[test]
    fn reviews_render_active_and_dots() {
        let page = stock_page();
        let html = region_html(&page, Region::Section(Section::Reviews));
        assert!(html.contains("Sophia R."));
        assert!(!html.contains("Marcus T.</cite>"));
        assert_eq!(html.matches("class=\"dot").count(), 6);
        assert_eq!(html.matches("dot active").count(), 1);
    }

    #[test]
    fn form_inputs_bind_values_and_required() {
        let page = stock_page();
        let sim = SimEnv::new();
        let mounted = page.mount(&sim.environment());
        mounted
            .dispatch(UserEvent::EditField {
                field: FormField::Phone,
                value: "0911".into(),
            })
            .unwrap();
        let html = region_html(&page, Region::Section(Section::Contact));
        assert!(html.contains("value=\"0911\""));
        assert!(html.contains("type=\"datetime-local\""));
        assert_eq!(html.matches(" required").count(), 3);
    }

    #[test]
    fn content_is_escaped() {
        let mut content = crate::content::Content::stock();
        content.reviews[0].body = "<script>alert(1)</script>".into();
        let page = crate::page::Page::new(content, crate::config::PageConfig::default());
        let html = region_html(&page, Region::Section(Section::Reviews));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn unrevealed_sections_lack_revealed_class() {
        let page = stock_page();
        let html = region_html(&page, Region::Section(Section::Gallery));
        assert!(html.contains("class=\"gallery reveal\""));
    }

    #[test]
    fn hero_renders_particles() {
        let page = stock_page();
        let html = region_html(&page, Region::Section(Section::Hero));
        assert_eq!(html.matches("class=\"particle\"").count(), 20);
        assert!(html.contains("117 reviews"));
    }

    #[test]
    fn full_page_has_every_section_and_colors() {
        let page = stock_page();
        let html = render_page(&page.render_context()).into_string();
        for section in Section::ALL {
            assert!(html.contains(&format!("id=\"{}\"", section.anchor())));
        }
        assert!(html.contains("--color-accent: #d4af37"));
        assert!(html.contains("<title>The Alchemist Dine &amp; Wine</title>"));
    }

    #[test]
    fn generate_writes_page_and_snapshot() {
        let tmp = TempDir::new().unwrap();
        let page = stock_page();
        let path = generate(tmp.path(), &page.render_context()).unwrap();
        assert!(path.ends_with("index.html"));
        let json = std::fs::read_to_string(tmp.path().join("state.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["state"]["active_review_index"], 0);
        assert_eq!(value["state"]["is_scrolled"], false);
    }

    #[test]
    fn title_case_lowers_tail() {
        assert_eq!(title_case("DINE & WINE"), "Dine & Wine");
    }
}
