mod common;

use common::TestApp;
use toolroom_api::entities::HistoryAction;
use toolroom_api::services::checkout::{CheckAction, CheckInOutRequest, TransitionOutcome};
use toolroom_api::services::inventory::CreateItemInput;

/// Two overlapping checkouts of the same item must never both succeed: the
/// conditional update (guarded by expected prior status) admits exactly one.
#[tokio::test]
async fn concurrent_checkouts_admit_exactly_one_winner() {
    let app = TestApp::new().await;
    app.state
        .services
        .inventory
        .create_item(CreateItemInput {
            item_id: "RACE-1".to_string(),
            item_name: "Torque Wrench".to_string(),
            serial_number: None,
        })
        .await
        .expect("seed item");

    let mut tasks = Vec::new();
    for i in 0..10 {
        let engine = app.state.services.checkout.clone();
        tasks.push(tokio::spawn(async move {
            engine
                .process(CheckInOutRequest {
                    item_id: "RACE-1".to_string(),
                    serial_number: "SN-R".to_string(),
                    action: CheckAction::Checkout,
                    user_id: Some(format!("user-{}", i)),
                })
                .await
        }));
    }

    let mut completed = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.expect("join").expect("process") {
            TransitionOutcome::Completed { .. } => completed += 1,
            TransitionOutcome::Rejected { .. } => rejected += 1,
            TransitionOutcome::NotFound { .. } => panic!("item exists; not-found is wrong"),
        }
    }

    assert_eq!(completed, 1, "exactly one checkout must win");
    assert_eq!(rejected, 9);

    // exactly one checkout history entry despite ten attempts
    let history = app
        .state
        .services
        .inventory
        .item_history("RACE-1")
        .await
        .expect("history");
    let checkouts = history
        .iter()
        .filter(|h| h.action == HistoryAction::Checkout)
        .count();
    assert_eq!(checkouts, 1);
}
