//! # Command Line Front End
//!
//! Parses `lounge ...` invocations, runs the matching command and prints
//! the result.
//!
//! ```text
//! lounge menu --category cocktails --sort price-asc
//! lounge cart add mojito --quantity 2 --notes "no sugar"
//! lounge table t-12 12
//! lounge checkout --payment card
//! ```
//!
//! `--json` switches every command to machine-readable output.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::commands::checkout::DbOrderGateway;
use crate::commands::{cart, checkout, coupon, menu, orders};
use crate::error::ApiError;
use crate::AppState;
use lounge_core::{
    CartSummary, CartValidation, MenuQuery, MenuSort, Money, OrderReceipt, PaymentMethod,
    Product, QuantityChange, SavedCart,
};

use crate::commands::cart::QuantityResponse;
use crate::commands::coupon::CouponResult;
use crate::commands::orders::OrderSummaryDto;
use crate::state::RestoreOutcome;

#[derive(Debug, Parser)]
#[command(name = "lounge", about = "Order from the lounge bar menu", version, long_about = None)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the menu
    Menu(MenuArgs),
    /// List menu categories
    Categories,
    /// Inspect or change the cart
    Cart(CartCommand),
    /// Select the table the order goes to
    Table {
        table_id: String,
        number: u32,
    },
    /// Check whether the cart can be submitted
    Validate,
    /// Submit the cart as an order
    Checkout {
        #[arg(long, short)]
        payment: PaymentMethod,
    },
    /// Stash the cart for up to 24 hours
    Save,
    /// Bring back the stashed cart
    Restore,
    /// Try a coupon code
    Coupon { code: String },
    /// Recently placed orders
    Orders {
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Debug, Args)]
pub struct MenuArgs {
    #[arg(long)]
    pub category: Option<String>,

    /// Matches name, description and category
    #[arg(long)]
    pub search: Option<String>,

    /// Hide inactive and sold-out products
    #[arg(long)]
    pub available: bool,

    /// Lowest discounted price, in cents
    #[arg(long)]
    pub min_cents: Option<i64>,

    /// Highest discounted price, in cents
    #[arg(long)]
    pub max_cents: Option<i64>,

    /// name, price-asc, price-desc, preparation-time or discount
    #[arg(long, default_value_t = MenuSort::Name)]
    pub sort: MenuSort,
}

impl MenuArgs {
    fn query(&self) -> MenuQuery {
        let mut query = MenuQuery::new().sort(self.sort).price_range(
            self.min_cents.map(Money::from_cents),
            self.max_cents.map(Money::from_cents),
        );
        if let Some(category) = &self.category {
            query = query.category(category);
        }
        if let Some(search) = &self.search {
            query = query.search(search);
        }
        if self.available {
            query = query.available_only();
        }
        query
    }
}

#[derive(Debug, Args)]
pub struct CartCommand {
    #[command(subcommand)]
    pub command: CartSubcommand,
}

/// `ITEM` is a line id or a product id.
#[derive(Debug, Subcommand)]
pub enum CartSubcommand {
    Show,
    Add {
        product_id: String,
        #[arg(long, short, default_value_t = 1)]
        quantity: i64,
        #[arg(long)]
        notes: Option<String>,
    },
    Inc {
        item: String,
    },
    Dec {
        item: String,
    },
    /// Zero or less removes the line
    SetQty {
        item: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    Remove {
        item: String,
    },
    /// Notes for one line
    Notes {
        item: String,
        notes: String,
    },
    /// Notes for the whole order
    OrderNotes {
        notes: String,
    },
    ServiceFee {
        #[arg(value_enum)]
        state: Toggle,
    },
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Cli {
    /// Runs the parsed command against the application state.
    pub async fn run(self, app: &AppState) -> Result<(), ApiError> {
        let out = Output {
            app,
            json: self.json,
        };

        match self.command {
            Command::Menu(args) => out.products(&menu::list_menu(&app.menu, &args.query())),
            Command::Categories => out.lines(&menu::list_categories(&app.menu)),
            Command::Cart(CartCommand { command }) => run_cart(command, app, &out).await,
            Command::Table { table_id, number } => {
                let summary = cart::select_table(&app.cart, &table_id, number).await?;
                out.cart(&summary)
            }
            Command::Validate => out.validation(&cart::validate_cart(&app.cart).await),
            Command::Checkout { payment } => {
                let gateway = DbOrderGateway::new(app.db.clone());
                let receipt = checkout::checkout(&app.cart, &gateway, payment).await?;
                out.receipt(&receipt)
            }
            Command::Save => out.saved(&cart::save_cart_for_later(&app.cart).await?),
            Command::Restore => out.restored(&cart::restore_saved_cart(&app.cart).await?),
            Command::Coupon { code } => {
                out.coupon(&coupon::apply_coupon(&app.config, &app.cart, &code).await)
            }
            Command::Orders { limit } => out.orders(&orders::list_orders(&app.db, limit).await?),
        }
    }
}

async fn run_cart(command: CartSubcommand, app: &AppState, out: &Output<'_>) -> Result<(), ApiError> {
    let store = &app.cart;

    match command {
        CartSubcommand::Show => out.cart(&cart::get_cart(store).await),
        CartSubcommand::Add {
            product_id,
            quantity,
            notes,
        } => {
            let summary =
                cart::add_to_cart(&app.menu, store, &product_id, Some(quantity), notes.as_deref())
                    .await?;
            out.cart(&summary)
        }
        CartSubcommand::Inc { item } => out.quantity(&cart::increment_cart_item(store, &item).await?),
        CartSubcommand::Dec { item } => out.quantity(&cart::decrement_cart_item(store, &item).await?),
        CartSubcommand::SetQty { item, quantity } => {
            out.quantity(&cart::update_cart_item(store, &item, quantity).await?)
        }
        CartSubcommand::Remove { item } => out.cart(&cart::remove_from_cart(store, &item).await),
        CartSubcommand::Notes { item, notes } => {
            out.cart(&cart::update_item_notes(store, &item, &notes).await?)
        }
        CartSubcommand::OrderNotes { notes } => out.cart(&cart::set_order_notes(store, &notes).await?),
        CartSubcommand::ServiceFee { state } => {
            let include = matches!(state, Toggle::On);
            out.cart(&cart::set_service_fee(store, include).await)
        }
        CartSubcommand::Clear => out.cart(&cart::clear_cart(store).await),
    }
}

// =============================================================================
// Output
// =============================================================================

struct Output<'a> {
    app: &'a AppState,
    json: bool,
}

impl Output<'_> {
    fn money(&self, amount: Money) -> String {
        self.app.config.format_currency(amount.cents())
    }

    /// Prints `value` as JSON when `--json` is set, otherwise runs `text`.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce()) -> Result<(), ApiError> {
        if self.json {
            let rendered = serde_json::to_string_pretty(value)
                .map_err(|e| ApiError::internal(format!("Could not render output: {}", e)))?;
            println!("{}", rendered);
        } else {
            text();
        }
        Ok(())
    }

    fn lines(&self, lines: &[String]) -> Result<(), ApiError> {
        self.emit(&lines, || lines.iter().for_each(|line| println!("{}", line)))
    }

    fn products(&self, products: &[Product]) -> Result<(), ApiError> {
        self.emit(&products, || {
            if products.is_empty() {
                println!("Nothing on the menu matches.");
            }
            for product in products {
                let mut line = format!(
                    "{:<14} {:<28} {:>10}",
                    product.id,
                    product.name,
                    self.money(product.effective_price())
                );
                if product.has_discount() {
                    line.push_str(&format!("  (-{}%, was {})", product.discount, self.money(product.price)));
                }
                if !product.is_available() {
                    line.push_str("  [unavailable]");
                } else if product.has_stock {
                    line.push_str(&format!("  [{} left]", product.stock));
                }
                println!("{}", line);
            }
        })
    }

    fn cart(&self, summary: &CartSummary) -> Result<(), ApiError> {
        self.emit(summary, || self.print_cart(summary))
    }

    fn print_cart(&self, summary: &CartSummary) {
        println!("{}", self.app.config.store_name);
        match (&summary.table_id, summary.table_number) {
            (Some(id), Some(number)) => println!("Table {} ({})", number, id),
            _ => println!("No table selected"),
        }

        if summary.items.is_empty() {
            println!("The cart is empty");
            return;
        }

        for item in &summary.items {
            println!(
                "  {:>3} x {:<28} {:>10}   [{}]",
                item.quantity,
                item.product.name,
                self.money(item.line_total()),
                item.id
            );
            if !item.notes.is_empty() {
                println!("        note: {}", item.notes);
            }
        }
        if !summary.notes.is_empty() {
            println!("Order notes: {}", summary.notes);
        }

        println!("Subtotal     {:>12}", self.money(summary.subtotal));
        if summary.include_service_fee {
            println!("Service 10%  {:>12}", self.money(summary.service_fee));
        } else {
            println!("Service      {:>12}", "off");
        }
        println!("Total        {:>12}", self.money(summary.total));
        println!("Ready in about {} min", summary.estimated_time);
    }

    fn quantity(&self, response: &QuantityResponse) -> Result<(), ApiError> {
        self.emit(response, || {
            match response.change {
                QuantityChange::Updated { quantity } => println!("Quantity is now {}", quantity),
                QuantityChange::Removed => println!("Removed from the cart"),
                QuantityChange::StockLimitReached { available } => {
                    println!("Only {} available, quantity unchanged", available)
                }
            }
            self.print_cart(&response.cart);
        })
    }

    fn validation(&self, validation: &CartValidation) -> Result<(), ApiError> {
        self.emit(validation, || {
            if validation.is_valid {
                println!("Ready for checkout");
            }
            for message in validation.messages() {
                println!("  - {}", message);
            }
        })
    }

    fn receipt(&self, receipt: &OrderReceipt) -> Result<(), ApiError> {
        self.emit(receipt, || {
            println!("Order {} placed", receipt.order_id);
            println!("Total {}", self.money(receipt.total));
            println!("Ready in about {} min", receipt.estimated_time);
        })
    }

    fn saved(&self, saved: &SavedCart) -> Result<(), ApiError> {
        self.emit(saved, || {
            println!(
                "Saved {} item(s) at {}",
                saved.item_count(),
                saved.saved_at.format("%Y-%m-%d %H:%M")
            )
        })
    }

    fn restored(&self, outcome: &RestoreOutcome) -> Result<(), ApiError> {
        self.emit(outcome, || match outcome {
            RestoreOutcome::Restored { total_items } => {
                println!("Restored {} item(s)", total_items)
            }
            RestoreOutcome::Expired { saved_at } => println!(
                "The saved cart from {} has expired",
                saved_at.format("%Y-%m-%d %H:%M")
            ),
            RestoreOutcome::NotFound => println!("No saved cart"),
        })
    }

    fn coupon(&self, result: &CouponResult) -> Result<(), ApiError> {
        self.emit(result, || {
            println!("{}", result.message);
            if let Some(discount) = result.discount {
                println!("Worth {} on the current subtotal", self.money(discount));
            }
        })
    }

    fn orders(&self, orders: &[OrderSummaryDto]) -> Result<(), ApiError> {
        self.emit(&orders, || {
            if orders.is_empty() {
                println!("No orders yet");
            }
            for order in orders {
                let table = order
                    .table_number
                    .map(|n| format!("table {}", n))
                    .unwrap_or_else(|| "no table".to_string());
                println!(
                    "{}  {}  {:<9} {:>3} item(s) {:>10}  {}",
                    order.created_at,
                    order.id,
                    table,
                    order.total_items,
                    self.money(order.total),
                    order.payment_method
                );
            }
        })
    }
}
