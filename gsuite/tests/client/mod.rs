mod load_and_validate;
