// ABOUTME: emits a json schema for the network diagnostic report to stdout.
// ABOUTME: intended for external validators consuming engine output across process boundaries.

fn main() {
    let schema = schemars::schema_for!(deskdiag_common::NetworkReport);
    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    println!("{json}");
}
