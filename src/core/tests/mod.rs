mod stall_engine_tests;
