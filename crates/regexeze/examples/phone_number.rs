//! Translate a Regexeze pattern and match it against a few candidates.
//!
//! Run with: cargo run -p regexeze --example phone_number

fn main() -> Result<(), regexeze::Error> {
    let pattern = regexeze::compile(
        "expr: [ name: area_code; expr: digit for 3; ]; \
         expr: '-' for zero_or_one; \
         expr: digit for 3; \
         expr: '-' for zero_or_one; \
         expr: digit for 4;",
    )?;
    println!("pattern: {}", pattern.as_str());

    for candidate in ["555-867-5309", "5558675309", "86753"] {
        match pattern.match_start(candidate)? {
            Some(caps) => {
                let area_code = caps.name("area_code").map_or("?", |m| m.as_str());
                println!("{candidate}: matched, area code {area_code}");
            }
            None => println!("{candidate}: no match"),
        }
    }
    Ok(())
}
