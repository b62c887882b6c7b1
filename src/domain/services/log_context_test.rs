use super::current;
use super::set_game_id;
use super::with_log_context;
use super::LogContext;

#[tokio::test]
async fn it_has_no_context_outside_dispatch() {
    assert_eq!(current(), None);
}

#[tokio::test]
async fn it_scopes_context_to_the_future() {
    let context = LogContext::new(7, 70, None);
    let context_id = context.context_id.to_string();

    let res = with_log_context(context, async {
        let inner = current().unwrap();
        assert_eq!(inner.context_id, context_id);
        assert_eq!(inner.user_id, Some(7));
        assert_eq!(inner.game_id, None);

        set_game_id("01hgame");
        return current().unwrap().game_id;
    })
    .await;

    assert_eq!(res, Some("01hgame".to_string()));
    assert_eq!(current(), None);
}

#[tokio::test]
async fn it_ignores_game_id_outside_dispatch() {
    set_game_id("01hgame");
    assert_eq!(current(), None);
}

#[test]
fn it_generates_unique_context_ids() {
    let first = LogContext::new(1, 1, Some("game"));
    let second = LogContext::new(1, 1, Some("game"));

    assert_ne!(first.context_id, second.context_id);
    assert_eq!(first.game_id, Some("game".to_string()));
}
