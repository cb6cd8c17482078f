//! # Interactive Prompt
//!
//! Line-based command loop over stdin. Each line is parsed into a command,
//! dispatched to the matching function in [`commands`], and the result is
//! printed as a table or as an `error [CODE]: message` line.
//!
//! [`commands`]: crate::commands

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::commands::{catalog, product, sync};
use crate::commands::catalog::{CategoryDto, SupplierDto};
use crate::commands::product::{NewProductInput, ProductDto, UpdateProductInput};
use crate::commands::sync::SyncReport;
use crate::error::ApiError;
use crate::state::AppState;

const HELP: &str = "\
Commands:
  list                          list active products
  search <text>                 search products by name
  low                           products at or below minimum stock
  show <id>                     product detail
  add <name> <price> <stock> <min>
                                create a product (price in cents)
  edit <id> <field> <value>     change one field (name, desc, price, min, barcode)
  stock <id> <value>            set stock to an absolute value
  delete <id>                   soft-delete a product
  categories                    list categories
  suppliers                     list suppliers
  addcat <name>                 create a category
  addsup <name>                 create a supplier
  delcat <id>                   delete an empty category
  delsup <id>                   delete an unused supplier
  sync                          pull all collections from the remote store
  sync products                 pull only products
  stats                         inventory summary
  help                          this text
  quit                          exit";

/// Runs the prompt loop until `quit` or end of input.
pub async fn run(state: AppState) -> io::Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    println!("bodega inventory console. Type 'help' for commands.");
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(line = %line, "command received");

        if matches!(line, "quit" | "exit") {
            break;
        }
        if let Err(err) = dispatch(&state, line).await {
            println!("error {}", err);
        }
    }
    println!("bye");
    Ok(())
}

async fn dispatch(state: &AppState, line: &str) -> Result<(), ApiError> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match command {
        "help" => println!("{}", HELP),
        "list" => print_products(&product::list_products(state).await?),
        "search" => {
            if rest.is_empty() {
                return Err(ApiError::validation("Usage: search <text>"));
            }
            print_products(&product::search_products(state, rest).await?);
        }
        "low" => {
            let products = product::low_stock_products(state).await?;
            if products.is_empty() {
                println!("no products below minimum stock");
            } else {
                print_products(&products);
            }
        }
        "show" => {
            if rest.is_empty() {
                return Err(ApiError::validation("Usage: show <id>"));
            }
            print_product_detail(&product::get_product(state, rest).await?);
        }
        "add" => {
            let input = parse_add(rest)?;
            let dto = product::create_product(state, input).await?;
            println!("created {} ({})", dto.name, dto.id);
        }
        "edit" => {
            let (id, input) = parse_edit(rest)?;
            let dto = product::update_product(state, id, input).await?;
            print_product_detail(&dto);
        }
        "stock" => {
            let (id, value) = parse_stock(rest)?;
            let dto = product::set_stock(state, id, value).await?;
            println!(
                "{}: stock {} (minimum {}){}",
                dto.name,
                dto.current_stock,
                dto.min_stock,
                if dto.low_stock { " LOW" } else { "" }
            );
        }
        "delete" => {
            if rest.is_empty() {
                return Err(ApiError::validation("Usage: delete <id>"));
            }
            product::delete_product(state, rest).await?;
            println!("deleted {}", rest);
        }
        "categories" => print_categories(&catalog::list_categories(state).await?),
        "suppliers" => print_suppliers(&catalog::list_suppliers(state).await?),
        "addcat" => {
            if rest.is_empty() {
                return Err(ApiError::validation("Usage: addcat <name>"));
            }
            let dto = catalog::create_category(state, rest).await?;
            println!("created {} ({})", dto.name, dto.id);
        }
        "addsup" => {
            if rest.is_empty() {
                return Err(ApiError::validation("Usage: addsup <name>"));
            }
            let dto = catalog::create_supplier(state, rest).await?;
            println!("created {} ({})", dto.name, dto.id);
        }
        "delcat" => {
            if rest.is_empty() {
                return Err(ApiError::validation("Usage: delcat <id>"));
            }
            catalog::delete_category(state, rest).await?;
            println!("deleted {}", rest);
        }
        "delsup" => {
            if rest.is_empty() {
                return Err(ApiError::validation("Usage: delsup <id>"));
            }
            catalog::delete_supplier(state, rest).await?;
            println!("deleted {}", rest);
        }
        "sync" => {
            let report = if rest == "products" {
                sync::sync_products(state).await?
            } else if rest.is_empty() {
                sync::sync_all(state).await?
            } else {
                return Err(ApiError::validation("Usage: sync [products]"));
            };
            print_sync_report(&report);
        }
        "stats" => {
            let stats = catalog::inventory_stats(state).await?;
            println!("active products:   {}", stats.active_products);
            println!("below minimum:     {}", stats.low_stock_products);
            println!("inventory value:   {}", stats.inventory_value_display);
        }
        _ => {
            return Err(ApiError::validation(format!(
                "Unknown command '{}'. Type 'help' for commands.",
                command
            )));
        }
    }
    Ok(())
}

/// Parses `add <name...> <price> <stock> <min>`. The trailing three tokens
/// are numeric, everything before them is the name.
fn parse_add(rest: &str) -> Result<NewProductInput, ApiError> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(ApiError::validation(
            "Usage: add <name> <price_cents> <stock> <min_stock>",
        ));
    }

    let name = tokens[..tokens.len() - 3].join(" ");
    let price_cents = parse_number(tokens[tokens.len() - 3], "price")?;
    let current_stock = parse_number(tokens[tokens.len() - 2], "stock")?;
    let min_stock = parse_number(tokens[tokens.len() - 1], "minimum stock")?;

    Ok(NewProductInput {
        name,
        price_cents,
        current_stock,
        min_stock,
        category_id: None,
        supplier_id: None,
        barcode: None,
    })
}

/// Parses `edit <id> <field> <value...>` into a single-field update.
fn parse_edit(rest: &str) -> Result<(&str, UpdateProductInput), ApiError> {
    const USAGE: &str = "Usage: edit <id> <name|desc|price|min|barcode> <value>";

    let mut parts = rest.splitn(3, char::is_whitespace);
    let (id, field, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(field), Some(value)) if !value.trim().is_empty() => {
            (id, field, value.trim())
        }
        _ => return Err(ApiError::validation(USAGE)),
    };

    let mut input = UpdateProductInput::default();
    match field {
        "name" => input.name = Some(value.to_string()),
        "desc" => input.description = Some(value.to_string()),
        "price" => input.price_cents = Some(parse_number(value, "price")?),
        "min" => input.min_stock = Some(parse_number(value, "minimum stock")?),
        "barcode" => input.barcode = Some(value.to_string()),
        _ => return Err(ApiError::validation(USAGE)),
    }
    Ok((id, input))
}

fn parse_stock(rest: &str) -> Result<(&str, i64), ApiError> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(value), None) => Ok((id, parse_number(value, "stock")?)),
        _ => Err(ApiError::validation("Usage: stock <id> <value>")),
    }
}

fn parse_number(token: &str, what: &str) -> Result<i64, ApiError> {
    token
        .parse::<i64>()
        .map_err(|_| ApiError::validation(format!("'{}' is not a valid {}", token, what)))
}

fn print_products(products: &[ProductDto]) {
    if products.is_empty() {
        println!("no products");
        return;
    }
    for p in products {
        println!(
            "{}  {:30}  {:>10}  stock {:>4}/{:<4}{}",
            p.id,
            truncate(&p.name, 30),
            p.price_display,
            p.current_stock,
            p.min_stock,
            if p.low_stock { "  LOW" } else { "" }
        );
    }
    println!("{} product(s)", products.len());
}

fn print_product_detail(p: &ProductDto) {
    println!("id:        {}", p.id);
    println!("name:      {}", p.name);
    if let Some(description) = &p.description {
        println!("about:     {}", description);
    }
    println!("price:     {}", p.price_display);
    println!(
        "stock:     {} (minimum {}){}",
        p.current_stock,
        p.min_stock,
        if p.low_stock { " LOW" } else { "" }
    );
    if let Some(barcode) = &p.barcode {
        println!("barcode:   {}", barcode);
    }
    println!("category:  {}", p.category_id);
    println!("supplier:  {}", p.supplier_id);
    println!("active:    {}", p.is_active);
}

fn print_categories(categories: &[CategoryDto]) {
    for c in categories {
        println!(
            "{}  {:30}  {} product(s)",
            c.id,
            truncate(&c.name, 30),
            c.product_count
        );
    }
    println!("{} categorie(s)", categories.len());
}

fn print_suppliers(suppliers: &[SupplierDto]) {
    for s in suppliers {
        println!(
            "{}  {:30}  {:20}  {} product(s)",
            s.id,
            truncate(&s.name, 30),
            s.city.as_deref().unwrap_or("-"),
            s.product_count
        );
    }
    println!("{} supplier(s)", suppliers.len());
}

fn print_sync_report(report: &SyncReport) {
    println!(
        "synced {} record(s): {} categories, {} suppliers, {} products",
        report.total, report.categories, report.suppliers, report.products
    );
    for error in &report.errors {
        println!("  skipped: {}", error);
    }
    if report.clean {
        println!("sync clean");
    } else {
        println!("sync finished with {} error(s)", report.errors.len());
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_multiword_name() {
        let input = parse_add("Arroz extra 1kg 2350 40 5").unwrap();
        assert_eq!(input.name, "Arroz extra 1kg");
        assert_eq!(input.price_cents, 2350);
        assert_eq!(input.current_stock, 40);
        assert_eq!(input.min_stock, 5);
    }

    #[test]
    fn test_parse_add_too_few_tokens() {
        assert!(parse_add("Arroz 2350").is_err());
    }

    #[test]
    fn test_parse_edit_name_keeps_spaces() {
        let (id, input) = parse_edit("abc-123 name Arroz extra 1kg").unwrap();
        assert_eq!(id, "abc-123");
        assert_eq!(input.name.as_deref(), Some("Arroz extra 1kg"));
        assert!(input.price_cents.is_none());
    }

    #[test]
    fn test_parse_edit_price() {
        let (_, input) = parse_edit("abc-123 price 2490").unwrap();
        assert_eq!(input.price_cents, Some(2490));
    }

    #[test]
    fn test_parse_edit_rejects_unknown_field() {
        assert!(parse_edit("abc-123 color red").is_err());
        assert!(parse_edit("abc-123 name").is_err());
    }

    #[test]
    fn test_parse_stock() {
        let (id, value) = parse_stock("abc-123 17").unwrap();
        assert_eq!(id, "abc-123");
        assert_eq!(value, 17);
    }

    #[test]
    fn test_parse_stock_rejects_garbage() {
        assert!(parse_stock("abc-123 many").is_err());
        assert!(parse_stock("abc-123").is_err());
    }

    #[test]
    fn test_truncate_keeps_short_names() {
        assert_eq!(truncate("Arroz", 30), "Arroz");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
