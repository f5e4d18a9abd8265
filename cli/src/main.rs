mod argparse;
mod catalog;
mod logger;

use anyhow::Context;
use log::debug;
use sift_core::{Mapper, SiftProcessor, SiftQuery};
use tabular::{Row, Table};

fn main() -> anyhow::Result<()> {
    let cli = argparse::parse_args();
    logger::init_logger(cli.verbose);

    let mut mapper = Mapper::new();
    mapper.register(catalog::field_map());
    let processor = SiftProcessor::new(mapper);

    let query = SiftQuery {
        filters: cli.filter,
        sorts: cli.sort,
        page: cli.page,
        page_size: cli.page_size,
    };
    let results = processor
        .process(&query, catalog::products(), &catalog::handlers())
        .context("query failed")?;
    debug!("query returned {} product(s)", results.len());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let mut table = Table::new("{:>}  {:<}  {:>}  {:<}  {:<}  {:<}").with_row(Row::from_cells(
        ["Id", "Name", "Price", "Category", "Available", "Tags"]
            .iter()
            .cloned(),
    ));
    for product in &results {
        table.add_row(
            Row::new()
                .with_cell(product.id)
                .with_cell(&product.name)
                .with_cell(format!("{:.2}", product.price))
                .with_cell(product.category)
                .with_cell(if product.is_available { "yes" } else { "no" })
                .with_cell(product.tags.join(", ")),
        );
    }
    print!("{}", table);

    Ok(())
}
