mod brochure_tests;
mod dashboard_tests;
