use bank_sms_rs::{Account, RawSms, SystemClock, process_sms};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let payload = if args.len() > 1 {
        std::fs::read_to_string(&args[1])?
    } else {
        println!("Using example SMS event\n");
        r#"{"sender":"BOIIND","body":"BOI - Rs.9360.00 Credited to your Ac XX9326 on 03-10-25 by UPI ref No.112115898277.Avl Bal 21080.15","timestamp":1759483800000}"#
            .to_string()
    };

    let sms = RawSms::from_event_json(&payload)?;
    let accounts = vec![
        Account::new("boi", "BOI Savings", "9326"),
        Account::new("hdfc", "HDFC Salary", "4455"),
    ];

    let Some(tx) = process_sms(&sms, &accounts, Some("hdfc"), &SystemClock) else {
        println!("No transaction found in SMS from {}", sms.sender);
        return Ok(());
    };

    let candidate = &tx.candidate;
    println!("Transaction:");
    println!("  Type: {}", candidate.transaction_type);
    println!("  Amount: {}", candidate.amount);
    println!("  Date: {}", candidate.occurred_at);
    println!("  Description: {}", candidate.description);
    println!("  Category: {}", candidate.category);
    if let Some(fragment) = &candidate.account_fragment {
        println!("  Account: XX{}", fragment);
    }
    if let Some(reference) = &candidate.reference_number {
        println!("  Reference: {}", reference);
    }
    match &tx.account_id {
        Some(id) => println!("  Matched account: {}", id),
        None => println!("  Matched account: none, ask the user"),
    }

    Ok(())
}
