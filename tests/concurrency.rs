use ballotchain::election::{Election, ElectionManager};
use ballotchain::ElectionError;
use futures::future::join_all;
use std::sync::Arc;

fn active_election(voters: usize) -> (Arc<Election>, Vec<(String, String)>) {
    let manager = ElectionManager::new(1, 6);
    let election = manager.create_election("Concurrent", None).unwrap();
    election.register_candidate("C1", "Carol", "Blue", "").unwrap();
    election.register_candidate("C2", "Dan", "Red", "").unwrap();
    let keys = (0..voters)
        .map(|i| {
            let id = format!("V{i:03}");
            let key = election.register_voter(&id, "voter", "v@x").unwrap();
            (id, key.to_hex())
        })
        .collect();
    election.start().unwrap();
    (election, keys)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_double_vote_admits_exactly_one() {
    let (election, keys) = active_election(1);
    let (voter, key) = keys[0].clone();

    let tasks = (0..16).map(|i| {
        let election = election.clone();
        let voter = voter.clone();
        let key = key.clone();
        tokio::spawn(async move {
            let candidate = if i % 2 == 0 { "C1" } else { "C2" };
            election.cast_vote(&voter, candidate, &key)
        })
    });
    let outcomes: Vec<_> = join_all(tasks).await.into_iter().map(|r| r.unwrap()).collect();

    let accepted = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    assert!(outcomes
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == ElectionError::AlreadyVoted(voter.clone())));
    assert_eq!(election.pending_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn votes_cast_while_mining_are_kept() {
    let (election, keys) = active_election(40);

    let casts = keys.iter().cloned().map(|(voter, key)| {
        let election = election.clone();
        tokio::spawn(async move { election.cast_vote(&voter, "C1", &key) })
    });
    let miners = (0..4).map(|_| {
        let election = election.clone();
        tokio::task::spawn_blocking(move || election.mine())
    });
    let (cast_results, mine_results) = futures::join!(join_all(casts), join_all(miners));

    assert!(cast_results.into_iter().all(|r| r.unwrap().is_ok()));
    for r in mine_results {
        match r.unwrap() {
            Ok(_) | Err(ElectionError::EmptyPool) => {}
            Err(e) => panic!("unexpected mining error: {e}"),
        }
    }
    // whatever the miners did not pick up is still pending
    if election.pending_count() > 0 {
        election.mine().unwrap();
    }
    assert_eq!(election.results().total_votes, 40);
    assert!(election.verify_chain().is_valid);
}
