use economic::{Economic, EconomicError, Entity, EntityProxy, Handle, InvoiceLines, TransportError};
use economic::{CurrentInvoice, CurrentInvoiceLine};
use economic_core::mock::MockTransport;
use serde_json::{json, Value};

fn line(economic: &Economic, description: &str) -> Entity<CurrentInvoiceLine> {
    let mut line = economic.current_invoice_lines().build();
    line.set("description", description).unwrap();
    line
}

#[tokio::test]
async fn test_new_invoice_saves_lines_then_itself() {
    let mock = MockTransport::new();
    mock.expect("CurrentInvoiceLine_CreateFromData").return_ok(json!({"Number": 1}));
    mock.expect("CurrentInvoiceLine_CreateFromData").return_ok(json!({"Number": 2}));
    mock.expect("CurrentInvoice_CreateFromData").return_ok(json!({"Id": 77}));

    let economic = Economic::from_session(mock.session());
    let mut invoice = economic.current_invoices().build();
    invoice.add_line(line(&economic, "Chairs"));
    invoice.add_line(line(&economic, "Tables"));
    invoice.save().await.unwrap();

    let invocations = mock.invocations();
    let operations: Vec<&str> = invocations.iter().map(|i| i.operation.as_str()).collect();
    assert_eq!(
        operations,
        [
            "CurrentInvoiceLine_CreateFromData",
            "CurrentInvoiceLine_CreateFromData",
            "CurrentInvoice_CreateFromData"
        ]
    );
    assert_eq!(invocations[0].payload["data"]["Description"], json!("Chairs"));
    assert_eq!(invocations[1].payload["data"]["Description"], json!("Tables"));

    // Unsaved invoice: lines go out without an invoice reference.
    assert!(invocations[0].payload["data"].get("InvoiceHandle").is_none());

    assert_eq!(invoice.id(), Some(&json!(77)));
    assert!(invoice.lines().iter().all(|l| l.is_persisted()));
    mock.verify();
}

#[tokio::test]
async fn test_persisted_invoice_points_lines_at_itself() {
    let mock = MockTransport::new();
    mock.expect("CurrentInvoice_FindByHandle")
        .return_ok(json!({"CurrentInvoiceHandle": {"Id": 12}}));
    mock.expect("CurrentInvoiceLine_CreateFromData").return_ok(json!({"Number": 1}));
    mock.expect("CurrentInvoice_UpdateFromData").return_ok(Value::Null);

    let economic = Economic::from_session(mock.session());
    let mut invoice: Entity<CurrentInvoice> = economic
        .current_invoices()
        .find_by_handle(&Handle::from_id(12))
        .await
        .unwrap()
        .remove(0);

    // A line built on a different session is rebound to the invoice's.
    let other = MockTransport::new();
    let mut stray = Entity::<CurrentInvoiceLine>::new(other.session());
    stray.set("description", "Delivery").unwrap();
    invoice.add_line(stray);

    invoice.save().await.unwrap();

    let invocations = mock.invocations();
    assert_eq!(invocations[1].payload["data"]["InvoiceHandle"], json!({"Id": 12}));
    assert_eq!(invocations[2].operation, "CurrentInvoice_UpdateFromData");
    assert!(invoice.lines()[0].session().same_as(invoice.session()));
    assert!(other.invocations().is_empty());
    assert_eq!(invoice.id(), Some(&json!(12)));
    mock.verify();
}

#[tokio::test]
async fn test_failing_line_aborts_the_cascade() {
    let mock = MockTransport::new();
    mock.expect("CurrentInvoiceLine_CreateFromData").return_ok(json!({"Number": 1}));
    mock.expect("CurrentInvoiceLine_CreateFromData").return_err(TransportError::Fault {
        code: "E03010".into(),
        message: "Quantity must be positive".into(),
    });

    let economic = Economic::from_session(mock.session());
    let mut invoice = economic.current_invoices().build();
    for description in ["first", "second", "third"] {
        invoice.add_line(line(&economic, description));
    }

    let err = invoice.save().await.unwrap_err();

    assert!(matches!(err, EconomicError::Validation { .. }));
    assert_eq!(mock.invocations().len(), 2);
    assert_eq!(mock.count("CurrentInvoice_CreateFromData"), 0);
    assert!(invoice.lines()[0].is_persisted());
    assert!(!invoice.lines()[1].is_persisted());
    assert!(!invoice.lines()[2].is_persisted());
    assert!(!invoice.is_persisted());
    mock.verify();
}

#[tokio::test]
async fn test_invoice_without_lines_is_a_single_call() {
    let mock = MockTransport::new();
    mock.expect("CurrentInvoice_CreateFromData").return_ok(json!({"Id": 3}));

    let mut invoice = Economic::from_session(mock.session()).current_invoices().build();
    invoice.set("other_reference", "PO-2211").unwrap();
    invoice.save().await.unwrap();

    assert_eq!(mock.invocations().len(), 1);
    assert_eq!(mock.invocations()[0].payload["data"]["OtherReference"], json!("PO-2211"));
}
