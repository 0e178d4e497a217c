use std::fmt::Write as _;

use catalog_core::{AppViewModel, DisplayState, Product, ProviderCardView, ProviderListing};

pub const SCROLL_MARKER: &str = ">> Jump to results";

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Fibre Products ==");
    let _ = writeln!(
        out,
        "Campaign: {} | Price: {} | Selected: {}",
        view.campaign.label(),
        view.price_bracket.label(),
        view.selected_count
    );

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "Notice: {notice}");
    }

    let _ = writeln!(out, "Fibre Providers:");
    match &view.listing {
        ProviderListing::Loading => {
            let _ = writeln!(out, "  Loading providers...");
        }
        ProviderListing::Failed(message) => {
            let _ = writeln!(out, "  ! Failed to load provider information. ({message})");
        }
        ProviderListing::Ready if view.providers.is_empty() => {
            let _ = writeln!(out, "  No options available");
        }
        ProviderListing::Ready => {
            for card in &view.providers {
                let _ = writeln!(out, "  {}", format_card(card));
            }
            if view.can_load_more {
                let _ = writeln!(out, "  ... type `more` to load more providers");
            }
        }
    }

    let _ = writeln!(out, "Products:");
    match &view.display {
        DisplayState::Idle => {
            let _ = writeln!(out, "  Select a provider to browse its products.");
        }
        DisplayState::Loading => {
            let _ = writeln!(out, "  Loading products...");
        }
        DisplayState::Results(products) => {
            for product in products {
                let _ = writeln!(out, "  {}", format_product(product));
            }
        }
        DisplayState::EmptyNoProducts => {
            let _ = writeln!(out, "  No products for the selected provider(s).");
        }
        DisplayState::EmptyFiltered => {
            let _ = writeln!(out, "  No products in this price range.");
        }
        DisplayState::Error(message) => {
            let _ = writeln!(out, "  Could not load products: {message}");
        }
    }
    out
}

fn format_card(card: &ProviderCardView) -> String {
    let mark = if card.selected { "[x]" } else { "[ ]" };
    format!("{mark} {} ({})", card.name, card.code)
}

fn format_product(product: &Product) -> String {
    format!(
        "{} - {} [{} / {}]",
        product.product_name,
        format_rate(product.product_rate),
        product.provider_code,
        product.product_code
    )
}

fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("R{rate:.0}")
    } else {
        format!("R{rate:.2}")
    }
}
