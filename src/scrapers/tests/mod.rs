mod test_fetcher;
