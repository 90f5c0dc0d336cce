mod flow_test;
