mod lot_parser_tests;
mod scan_tests;
