//! # Invoice Rendering
//!
//! Turns a finished order plus a user-editable template into invoice text.
//!
//! ## Template Syntax
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Placeholder       Replaced with                                        │
//! │  ───────────       ─────────────                                        │
//! │  {order_time}      2024-05-01 12:30:00                                  │
//! │  {items}           one line per order line, joined by "\n"              │
//! │  {total}           30.00         ({total:.Nf} for N decimals)           │
//! │  {currency}        configured currency symbol                           │
//! │  {store_name}      configured store name                                │
//! │  {{ / }}           literal brace                                        │
//! │                                                                         │
//! │  {items} and {total} are required. Anything else wrong with the         │
//! │  template (unknown name, stray brace, bad format) is a TemplateError.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Handling
//! ```text
//! render(snapshot, template)
//!      │
//!      ├── template parses ──► substituted text, template_error = None
//!      │
//!      └── template broken ──► fallback layout:
//!                                <items>
//!                                Total: <currency> <total>
//!                              template_error = Some(..)
//! ```
//! Rendering never fails and never touches the disk.

use crate::error::TemplateError;
use crate::types::{OrderLine, OrderSnapshot};

/// Template used until an admin saves their own.
pub const DEFAULT_INVOICE_TEMPLATE: &str =
    "Invoice\n{order_time}\n{items}\nTotal: {currency} {total:.2f}\n";

/// `{order_time}` format.
pub const ORDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Largest `N` accepted in `{total:.Nf}`.
const MAX_TOTAL_PRECISION: usize = 10;

// =============================================================================
// Template
// =============================================================================

/// Values a template can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    OrderTime,
    Items,
    Total,
    Currency,
    StoreName,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "order_time" => Some(Placeholder::OrderTime),
            "items" => Some(Placeholder::Items),
            "total" => Some(Placeholder::Total),
            "currency" => Some(Placeholder::Currency),
            "store_name" => Some(Placeholder::StoreName),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Placeholder::OrderTime => "order_time",
            Placeholder::Items => "items",
            Placeholder::Total => "total",
            Placeholder::Currency => "currency",
            Placeholder::StoreName => "store_name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        placeholder: Placeholder,
        /// Decimal places, `{total:.Nf}` only.
        precision: Option<usize>,
    },
}

/// A parsed invoice template.
///
/// Parsing up front lets the admin editor reject a broken template before it
/// is saved, and lets rendering substitute without any failure path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl InvoiceTemplate {
    /// Parses and checks a template.
    ///
    /// ## Example
    /// ```rust
    /// use tilly_core::invoice::InvoiceTemplate;
    /// use tilly_core::TemplateError;
    ///
    /// assert!(InvoiceTemplate::parse("{items}\nTotal {total}").is_ok());
    /// assert_eq!(
    ///     InvoiceTemplate::parse("{items}").unwrap_err(),
    ///     TemplateError::MissingPlaceholder("total".to_string()),
    /// );
    /// ```
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        if source.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|&(_, next)| next) == Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().map(|&(_, next)| next) == Some('}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateError::UnmatchedBrace { position }),
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        body.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedBrace { position });
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_field(&body)?);
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        for required in [Placeholder::Items, Placeholder::Total] {
            let present = segments.iter().any(|segment| {
                matches!(segment, Segment::Field { placeholder, .. } if *placeholder == required)
            });
            if !present {
                return Err(TemplateError::MissingPlaceholder(required.name().to_string()));
            }
        }

        Ok(InvoiceTemplate {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text as written.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// `name` or `name:spec` between braces.
fn parse_field(body: &str) -> Result<Segment, TemplateError> {
    let (name, spec) = match body.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (body, None),
    };

    let placeholder = Placeholder::from_name(name)
        .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;

    let precision = match spec {
        None | Some("") => None,
        Some(spec) if placeholder == Placeholder::Total => Some(parse_precision(spec).ok_or_else(
            || TemplateError::InvalidFormatSpec {
                placeholder: name.to_string(),
                spec: spec.to_string(),
            },
        )?),
        Some(spec) => {
            return Err(TemplateError::InvalidFormatSpec {
                placeholder: name.to_string(),
                spec: spec.to_string(),
            })
        }
    };

    Ok(Segment::Field {
        placeholder,
        precision,
    })
}

/// `.Nf` → `N`.
fn parse_precision(spec: &str) -> Option<usize> {
    let digits = spec.strip_prefix('.')?.strip_suffix('f')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits
        .parse()
        .ok()
        .filter(|&precision| precision <= MAX_TOTAL_PRECISION)
}

// =============================================================================
// Renderer
// =============================================================================

/// Result of rendering: always usable text, plus the template problem if
/// the fallback layout had to be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedInvoice {
    pub text: String,
    pub template_error: Option<TemplateError>,
}

impl RenderedInvoice {
    /// `true` when the caller's template was used as written.
    pub fn is_ok(&self) -> bool {
        self.template_error.is_none()
    }
}

/// Renders invoices with a fixed currency symbol and store name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRenderer {
    currency: String,
    store_name: String,
}

impl InvoiceRenderer {
    pub fn new(currency: impl Into<String>) -> Self {
        InvoiceRenderer {
            currency: currency.into(),
            store_name: String::new(),
        }
    }

    /// Sets the value for `{store_name}`.
    pub fn with_store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = store_name.into();
        self
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// `"<item> x <qty> @ <cur> <unit:2dp> = <cur> <line_total:2dp>"`
    pub fn item_line(&self, line: &OrderLine) -> String {
        format!(
            "{} x {} @ {} {} = {} {}",
            line.item, line.quantity, self.currency, line.unit_price, self.currency, line.line_total
        )
    }

    /// Every order line, in snapshot order, joined by newlines.
    pub fn items_block(&self, snapshot: &OrderSnapshot) -> String {
        snapshot
            .lines
            .iter()
            .map(|line| self.item_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders `template`, falling back to the minimal layout if it is broken.
    pub fn render(&self, snapshot: &OrderSnapshot, template: &str) -> RenderedInvoice {
        match InvoiceTemplate::parse(template) {
            Ok(template) => RenderedInvoice {
                text: self.render_template(snapshot, &template),
                template_error: None,
            },
            Err(err) => RenderedInvoice {
                text: self.fallback(snapshot),
                template_error: Some(err),
            },
        }
    }

    /// Substitutes into an already-parsed template.
    pub fn render_template(&self, snapshot: &OrderSnapshot, template: &InvoiceTemplate) -> String {
        let mut out = String::with_capacity(template.source.len() + 64 * snapshot.lines.len());

        for segment in &template.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field {
                    placeholder,
                    precision,
                } => match placeholder {
                    Placeholder::OrderTime => out.push_str(
                        &snapshot.created_at.format(ORDER_TIME_FORMAT).to_string(),
                    ),
                    Placeholder::Items => out.push_str(&self.items_block(snapshot)),
                    Placeholder::Total => {
                        out.push_str(&snapshot.total.format_decimals(precision.unwrap_or(2)))
                    }
                    Placeholder::Currency => out.push_str(&self.currency),
                    Placeholder::StoreName => out.push_str(&self.store_name),
                },
            }
        }

        out
    }

    /// Fixed layout used when the template cannot be rendered.
    pub fn fallback(&self, snapshot: &OrderSnapshot) -> String {
        format!(
            "{}\nTotal: {} {}",
            self.items_block(snapshot),
            self.currency,
            snapshot.total
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderAggregator;
    use chrono::{Local, TimeZone};

    fn water_order() -> OrderSnapshot {
        let created_at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let mut order = OrderAggregator::with_created_at(created_at);
        order.add("Drinks", "Water", 2, 10.0).unwrap();
        order.add("Drinks", "Water", 1, 10.0).unwrap();
        order.add("Food", "Banku", 1, "20.5").unwrap();
        order.snapshot()
    }

    fn renderer() -> InvoiceRenderer {
        InvoiceRenderer::new("GHS")
    }

    #[test]
    fn test_item_lines() {
        let snapshot = water_order();
        assert_eq!(
            renderer().items_block(&snapshot),
            "Water x 3 @ GHS 10.00 = GHS 30.00\nBanku x 1 @ GHS 20.50 = GHS 20.50"
        );
    }

    #[test]
    fn test_render_default_template() {
        let invoice = renderer().render(&water_order(), DEFAULT_INVOICE_TEMPLATE);

        assert!(invoice.is_ok());
        assert_eq!(
            invoice.text,
            "Invoice\n\
             2024-05-01 12:30:00\n\
             Water x 3 @ GHS 10.00 = GHS 30.00\n\
             Banku x 1 @ GHS 20.50 = GHS 20.50\n\
             Total: GHS 50.50\n"
        );
    }

    #[test]
    fn test_render_custom_template() {
        let renderer = InvoiceRenderer::new("$").with_store_name("Asanka Local");
        let invoice = renderer.render(
            &water_order(),
            "{store_name} {{copy}}\n{items}\n= {currency}{total}",
        );

        assert!(invoice.is_ok());
        assert!(invoice.text.starts_with("Asanka Local {copy}\n"));
        assert!(invoice.text.ends_with("= $50.50"));
    }

    #[test]
    fn test_total_precision() {
        let invoice = renderer().render(&water_order(), "{items}\n{total:.1f}|{total:.3f}|{total:}|{total:.0f}");
        assert!(invoice.is_ok());
        // 50.50 at zero decimals rounds up, like line totals
        assert!(invoice.text.ends_with("50.5|50.500|50.50|51"));
    }

    #[test]
    fn test_missing_total_falls_back() {
        let invoice = renderer().render(&water_order(), "Invoice\n{items}\n");

        assert!(!invoice.is_ok());
        assert_eq!(
            invoice.template_error,
            Some(TemplateError::MissingPlaceholder("total".to_string()))
        );
        assert!(invoice.text.contains("Water x 3 @ GHS 10.00 = GHS 30.00"));
        assert!(invoice.text.contains("Banku x 1 @ GHS 20.50 = GHS 20.50"));
        assert!(invoice.text.ends_with("Total: GHS 50.50"));
    }

    #[test]
    fn test_unknown_placeholder_falls_back() {
        let invoice = renderer().render(&water_order(), "{items}\n{total}\n{tax}");
        assert_eq!(
            invoice.template_error,
            Some(TemplateError::UnknownPlaceholder("tax".to_string()))
        );
        assert_eq!(invoice.text, renderer().fallback(&water_order()));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(InvoiceTemplate::parse("  ").unwrap_err(), TemplateError::Empty);
        assert_eq!(
            InvoiceTemplate::parse("{items} {total").unwrap_err(),
            TemplateError::UnclosedBrace { position: 8 }
        );
        assert_eq!(
            InvoiceTemplate::parse("{items} } {total}").unwrap_err(),
            TemplateError::UnmatchedBrace { position: 8 }
        );
        assert!(matches!(
            InvoiceTemplate::parse("{items} {total:>10}").unwrap_err(),
            TemplateError::InvalidFormatSpec { .. }
        ));
        assert!(matches!(
            InvoiceTemplate::parse("{items:.2f} {total}").unwrap_err(),
            TemplateError::InvalidFormatSpec { .. }
        ));
        assert_eq!(
            InvoiceTemplate::parse("{} {items} {total}").unwrap_err(),
            TemplateError::UnknownPlaceholder(String::new())
        );
    }

    #[test]
    fn test_empty_order_still_renders() {
        let snapshot = OrderAggregator::new().snapshot();
        let invoice = renderer().render(&snapshot, "{items}");
        assert!(!invoice.is_ok());
        assert_eq!(invoice.text, "\nTotal: GHS 0.00");
    }

    #[test]
    fn test_default_template_parses() {
        let template = InvoiceTemplate::parse(DEFAULT_INVOICE_TEMPLATE).unwrap();
        assert_eq!(template.source(), DEFAULT_INVOICE_TEMPLATE);
    }
}
