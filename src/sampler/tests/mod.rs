mod generate_test;
