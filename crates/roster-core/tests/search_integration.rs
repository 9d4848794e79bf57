//! Integration tests for the search engine.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roster_core::search::{Criteria, PageRequest, PagingMode, SortSpec};
use roster_core::{
    ComposeStrategy, Error, JoinedRow, MemberStore, MemoryStore, ProjectedRow, SearchConfig,
    SearchExecutor, SledStore, StoreConfig,
};
use roster_proto::{Column, Filter, FilterExpr, ReadQuery};

/// Store wrapper that records how often each operation runs.
struct CountingStore<S> {
    inner: S,
    fetches: AtomicUsize,
    counts: AtomicUsize,
    fail_counts: bool,
}

impl<S> CountingStore<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            fetches: AtomicUsize::new(0),
            counts: AtomicUsize::new(0),
            fail_counts: false,
        }
    }

    fn failing_counts(inner: S) -> Self {
        Self {
            fail_counts: true,
            ..Self::new(inner)
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn counts(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.fetches.store(0, Ordering::SeqCst);
        self.counts.store(0, Ordering::SeqCst);
    }
}

impl<S: MemberStore> MemberStore for CountingStore<S> {
    fn fetch(&self, query: &ReadQuery) -> Result<Vec<JoinedRow>, Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(query)
    }

    fn count(&self, filter: &Filter) -> Result<u64, Error> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        if self.fail_counts {
            return Err(Error::StoreUnavailable("count timed out".to_string()));
        }
        self.inner.count(filter)
    }
}

/// teamA: member1 (10), member2 (20). teamB: member3 (30), member4 (40).
fn seed_four(store: &MemoryStore) {
    let team_a = store.insert_team("teamA");
    let team_b = store.insert_team("teamB");
    store.insert_member("member1", 10, Some(team_a.id)).unwrap();
    store.insert_member("member2", 20, Some(team_a.id)).unwrap();
    store.insert_member("member3", 30, Some(team_b.id)).unwrap();
    store.insert_member("member4", 40, Some(team_b.id)).unwrap();
}

fn counting_executor() -> SearchExecutor<CountingStore<MemoryStore>> {
    let store = MemoryStore::new();
    seed_four(&store);
    SearchExecutor::new(CountingStore::new(store))
}

fn names(rows: &[ProjectedRow]) -> Vec<&str> {
    rows.iter().map(ProjectedRow::member_name).collect()
}

#[test]
fn test_team_and_age_range() {
    let executor = counting_executor();
    let criteria = Criteria::builder()
        .team_name("teamB")
        .age_goe(35)
        .age_loe(40)
        .build();

    let rows = executor.search(&criteria).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].member_name(), "member4");
    assert_eq!(rows[0].age(), 40);
    assert_eq!(rows[0].team_name(), Some("teamB"));
    assert_eq!(executor.store().counts(), 0);
}

#[test]
fn test_optimized_short_first_page_skips_count() {
    let executor = counting_executor();
    let page = executor
        .search_page_optimized(&Criteria::unconstrained(), 0, 10)
        .unwrap();

    assert_eq!(page.len(), 4);
    assert_eq!(page.total, 4);
    assert_eq!(executor.store().fetches(), 1);
    assert_eq!(executor.store().counts(), 0);
}

#[test]
fn test_optimized_full_first_page_counts() {
    let executor = counting_executor();
    let page = executor
        .search_page_optimized(&Criteria::unconstrained(), 0, 2)
        .unwrap();

    assert_eq!(names(&page.content), vec!["member1", "member2"]);
    assert_eq!(page.total, 4);
    assert_eq!(page.total_pages(), 2);
    assert!(page.has_next());
    assert_eq!(executor.store().counts(), 1);
}

#[test]
fn test_optimized_short_later_page_counts() {
    let executor = counting_executor();
    let page = executor
        .search_page_optimized(&Criteria::unconstrained(), 2, 10)
        .unwrap();

    assert_eq!(names(&page.content), vec!["member3", "member4"]);
    assert_eq!(page.total, 4);
    assert_eq!(executor.store().counts(), 1);
}

#[test]
fn test_naive_always_counts() {
    let executor = counting_executor();
    let page = executor
        .search_page(&Criteria::unconstrained(), 0, 10)
        .unwrap();

    assert_eq!(page.total, 4);
    assert_eq!(executor.store().counts(), 1);
}

#[test]
fn test_offset_past_end() {
    let executor = counting_executor();
    for mode in [PagingMode::Naive, PagingMode::Optimized] {
        let request = PageRequest::new(100, 10).unwrap();
        let page = executor
            .search_page_with(&Criteria::unconstrained(), &request, mode)
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 4);
        assert!(!page.has_next());
    }
}

#[test]
fn test_offset_at_total() {
    let executor = counting_executor();
    for mode in [PagingMode::Naive, PagingMode::Optimized] {
        let request = PageRequest::new(4, 2).unwrap();
        let page = executor
            .search_page_with(&Criteria::unconstrained(), &request, mode)
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.offset, 4);
        assert_eq!(page.total, 4);
        assert!(!page.has_next());
    }
    // an empty page past the start proves nothing, so both modes count
    assert_eq!(executor.store().counts(), 2);
}

#[test]
fn test_empty_result_first_page() {
    let executor = counting_executor();
    let criteria = Criteria::builder().team_name("teamZ").build();
    let page = executor.search_page_optimized(&criteria, 0, 10).unwrap();

    assert!(page.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(executor.store().counts(), 0);
}

#[test]
fn test_count_failure_fails_page() {
    let store = MemoryStore::new();
    seed_four(&store);
    let executor = SearchExecutor::new(CountingStore::failing_counts(store));

    let result = executor.search_page(&Criteria::unconstrained(), 0, 2);
    assert!(matches!(result, Err(Error::StoreUnavailable(_))));

    // a short first page never needs the failing count
    let page = executor
        .search_page_optimized(&Criteria::unconstrained(), 0, 10)
        .unwrap();
    assert_eq!(page.total, 4);
}

#[test]
fn test_sort_with_ties() {
    let store = MemoryStore::new();
    let team = store.insert_team("teamA");
    store.insert_member("carol", 30, Some(team.id)).unwrap();
    store.insert_member("alice", 30, Some(team.id)).unwrap();
    store.insert_member("bob", 40, None).unwrap();
    store.insert_member("dave", 20, Some(team.id)).unwrap();
    let executor = SearchExecutor::new(store);

    let sort = SortSpec::unsorted().desc("age").asc("name");
    let rows = executor
        .search_sorted(&Criteria::unconstrained(), &sort)
        .unwrap();
    assert_eq!(names(&rows), vec!["bob", "alice", "carol", "dave"]);

    let sort = SortSpec::parse("team.name;name").unwrap();
    let rows = executor
        .search_sorted(&Criteria::unconstrained(), &sort)
        .unwrap();
    // members without a team sort first
    assert_eq!(names(&rows), vec!["bob", "alice", "carol", "dave"]);
    assert_eq!(rows[0].team_name(), None);
}

#[test]
fn test_sorted_page() {
    let executor = counting_executor();
    let request = PageRequest::of_page(1, 2)
        .unwrap()
        .with_sort(SortSpec::unsorted().desc("age"));

    let page = executor
        .search_page_with(&Criteria::unconstrained(), &request, PagingMode::Optimized)
        .unwrap();
    assert_eq!(names(&page.content), vec!["member2", "member1"]);
    assert_eq!(page.page_number(), 1);
    assert!(page.is_last());
}

#[test]
fn test_unknown_sort_field_issues_no_query() {
    let executor = counting_executor();
    let request = PageRequest::new(0, 10)
        .unwrap()
        .with_sort(SortSpec::unsorted().asc("age").asc("salary"));

    let result =
        executor.search_page_with(&Criteria::unconstrained(), &request, PagingMode::Naive);
    match result {
        Err(Error::UnresolvedSortField(name)) => assert_eq!(name, "salary"),
        other => panic!("expected UnresolvedSortField, got {other:?}"),
    }
    assert_eq!(executor.store().fetches(), 0);
    assert_eq!(executor.store().counts(), 0);
}

#[test]
fn test_inverted_age_range_issues_no_query() {
    let executor = counting_executor();
    let criteria = Criteria::builder().age_goe(40).age_loe(10).build();

    assert!(matches!(
        executor.search_page(&criteria, 0, 10),
        Err(Error::InvalidBound(_))
    ));
    assert_eq!(executor.store().fetches(), 0);
}

#[test]
fn test_members_without_team() {
    let store = MemoryStore::new();
    seed_four(&store);
    store.insert_member("loner", 35, None).unwrap();
    let executor = SearchExecutor::new(store);

    let rows = executor
        .search(&Criteria::builder().age_goe(35).build())
        .unwrap();
    assert_eq!(names(&rows), vec!["member4", "loner"]);
    assert_eq!(rows[1].team_id(), None);

    // an equality on team name never matches a missing team
    let rows = executor
        .search(&Criteria::builder().team_name("teamB").age_goe(35).build())
        .unwrap();
    assert_eq!(names(&rows), vec!["member4"]);
}

#[test]
fn test_search_where() {
    let executor = counting_executor();
    let filter = Filter::all()
        .and(FilterExpr::ne(Column::TeamName, "teamA"))
        .and(FilterExpr::lt(Column::MemberAge, 40));

    let rows = executor.search_where(&filter).unwrap();
    assert_eq!(names(&rows), vec!["member3"]);
}

#[test]
fn test_sled_store_search() {
    let dir = tempfile::tempdir().unwrap();
    let store = SledStore::open(StoreConfig::new(dir.path())).unwrap();
    let team_a = store.insert_team("teamA").unwrap();
    let team_b = store.insert_team("teamB").unwrap();
    store.insert_member("member1", 10, Some(team_a.id)).unwrap();
    store.insert_member("member2", 20, Some(team_a.id)).unwrap();
    store.insert_member("member3", 30, Some(team_b.id)).unwrap();
    store.insert_member("member4", 40, Some(team_b.id)).unwrap();

    let executor = SearchExecutor::new(store);
    let criteria = Criteria::builder().team_name("teamB").build();

    let page = executor.search_page(&criteria, 0, 1).unwrap();
    assert_eq!(names(&page.content), vec!["member3"]);
    assert_eq!(page.total, 2);

    let page = executor.search_page_optimized(&criteria, 0, 5).unwrap();
    assert_eq!(names(&page.content), vec!["member3", "member4"]);
    assert_eq!(page.total, 2);
}

// Randomized checks. Seeds are fixed so failures reproduce.

const TEAMS: [&str; 3] = ["teamA", "teamB", "teamC"];
const NAMES: [&str; 5] = ["ann", "ben", "cat", "dan", "eve"];

fn random_store(rng: &mut StdRng) -> MemoryStore {
    let store = MemoryStore::new();
    let teams: Vec<u64> = TEAMS.iter().map(|name| store.insert_team(*name).id).collect();
    for _ in 0..rng.gen_range(0..40) {
        let name = NAMES[rng.gen_range(0..NAMES.len())];
        let team = if rng.gen_bool(0.2) {
            None
        } else {
            Some(teams[rng.gen_range(0..teams.len())])
        };
        store.insert_member(name, rng.gen_range(0..60), team).unwrap();
    }
    store
}

fn random_criteria(rng: &mut StdRng) -> Criteria {
    let mut builder = Criteria::builder();
    if rng.gen_bool(0.3) {
        builder = builder.member_name(NAMES[rng.gen_range(0..NAMES.len())]);
    }
    if rng.gen_bool(0.3) {
        builder = builder.member_name("   ");
    }
    if rng.gen_bool(0.4) {
        builder = builder.team_name(TEAMS[rng.gen_range(0..TEAMS.len())]);
    }
    if rng.gen_bool(0.5) {
        builder = builder.age_goe(rng.gen_range(0..40));
    }
    if rng.gen_bool(0.5) {
        builder = builder.age_loe(rng.gen_range(20..60));
    }
    builder.build()
}

fn oracle(all: &[ProjectedRow], criteria: &Criteria) -> Vec<ProjectedRow> {
    all.iter()
        .filter(|row| criteria.member_name().map_or(true, |n| row.member_name() == n))
        .filter(|row| criteria.team_name().map_or(true, |t| row.team_name() == Some(t)))
        .filter(|row| criteria.age_goe().map_or(true, |a| row.age() >= a))
        .filter(|row| criteria.age_loe().map_or(true, |a| row.age() <= a))
        .cloned()
        .collect()
}

#[test]
fn test_random_criteria_match_oracle() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);
    for _ in 0..50 {
        let store = random_store(&mut rng);
        let lenient = SearchConfig::default().allow_inverted_age_range();
        let batch = SearchExecutor::with_config(&store, lenient.clone());
        let incremental = SearchExecutor::with_config(
            &store,
            lenient.with_compose_strategy(ComposeStrategy::Incremental),
        );
        let all = batch.search(&Criteria::unconstrained()).unwrap();

        for _ in 0..10 {
            let criteria = random_criteria(&mut rng);
            let expected = oracle(&all, &criteria);
            assert_eq!(batch.search(&criteria).unwrap(), expected, "{criteria:?}");
            assert_eq!(
                incremental.search(&criteria).unwrap(),
                expected,
                "{criteria:?}"
            );
        }
    }
}

#[test]
fn test_random_pages_agree_across_modes() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0002);
    for _ in 0..50 {
        let store = CountingStore::new(random_store(&mut rng));
        let executor = SearchExecutor::with_config(
            &store,
            SearchConfig::default().allow_inverted_age_range(),
        );

        for _ in 0..10 {
            let criteria = random_criteria(&mut rng);
            let offset = if rng.gen_bool(0.5) { 0 } else { rng.gen_range(0..50) };
            let limit = rng.gen_range(1..20);

            let naive = executor.search_page(&criteria, offset, limit).unwrap();
            store.reset();
            let optimized = executor
                .search_page_optimized(&criteria, offset, limit)
                .unwrap();

            assert_eq!(naive, optimized, "{criteria:?} offset={offset} limit={limit}");
            let short_first = offset == 0 && optimized.len() < limit as usize;
            assert_eq!(store.counts(), usize::from(!short_first));
            assert_eq!(store.fetches(), 1);
        }
    }
}
