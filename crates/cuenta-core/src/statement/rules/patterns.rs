//! Common regex patterns for statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Tax id: NN-NNNNNNNN-N
    pub static ref TAX_ID: Regex = Regex::new(
        r"\d{2}-\d{8}-\d"
    ).unwrap();

    pub static ref TAX_ID_EXACT: Regex = Regex::new(
        r"^\d{2}-\d{8}-\d$"
    ).unwrap();

    // Dates are kept verbatim as DD/MM/YYYY
    pub static ref DATE: Regex = Regex::new(
        r"\d{2}/\d{2}/\d{4}"
    ).unwrap();

    pub static ref LEADING_DATE: Regex = Regex::new(
        r"^(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    // Anything that looks like a day/month pair disqualifies a name header
    pub static ref DAY_MONTH: Regex = Regex::new(
        r"\d{2}/\d{2}"
    ).unwrap();

    // Wide layout amounts: 1.234,56
    pub static ref AMOUNT: Regex = Regex::new(
        r"\d{1,3}(?:\.\d{3})*,\d{2}"
    ).unwrap();

    // Block layout amounts: $ 1.234,56 or $ -1.234,56
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        r"\$\s*(-?\d+(?:\.\d{3})*,\d{2})"
    ).unwrap();
}
