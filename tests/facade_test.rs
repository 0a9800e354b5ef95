use rstest::*;

#[rstest]
fn test_core_surface_needs_no_feature() {
	// Arrange
	let settings = tablecraft::TableSettings::default();

	// Act
	let state = tablecraft::StateParser::from_settings(&settings).parse("page=3&perPage=50");

	// Assert
	assert_eq!(state.pagination.page, 3);
	assert_eq!(tablecraft::core::constants::ARRAY_SEPARATOR, settings.separator);
}

#[cfg(all(feature = "server", feature = "client"))]
#[rstest]
#[tokio::test]
async fn test_full_prelude_pairs_server_and_client() {
	use std::sync::Arc;
	use tablecraft::prelude::*;

	// Arrange
	let table: ServerTable<u32> = ServerTable::builder(
		"numbers",
		row_fetcher(|query: Query<FilterMap>| async move {
			let rows = (0..query.pagination.per_page).collect();
			Ok::<_, TableError>(ListResult::<u32>::new(rows).with_total(100))
		}),
	)
	.build();
	let navigator = Arc::new(MemoryNavigator::default());
	let sync = TableStateSync::builder(navigator.clone()).build();

	// Act
	sync.set_pagination(PaginationIndex { page_index: 4, page_size: 20 });
	sync.flush();
	let result = table.load(navigator.search_params()).await.unwrap();

	// Assert
	assert_eq!(result.state.query.pagination.page, 5);
	assert_eq!(result.page_count, 5);
}
