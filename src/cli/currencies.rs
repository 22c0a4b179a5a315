use super::ui;
use crate::core::Currency;
use comfy_table::Cell;

pub fn run() {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Name")]);
    for currency in Currency::ALL {
        table.add_row(vec![Cell::new(currency.code()), Cell::new(currency.label())]);
    }
    println!("{table}");
}
